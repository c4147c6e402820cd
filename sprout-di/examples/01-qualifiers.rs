// note: this example assumes you've analyzed the previous one

use sprout_di::component::{ComponentDescriptor, ComponentId};
use sprout_di::container::Container;
use sprout_di::instance_provider::{ComponentInstancePtr, TypedComponentInstanceProvider};

struct DataSource {
    url: &'static str,
}

struct ReportService {
    primary: ComponentInstancePtr<DataSource>,
    replica: ComponentInstancePtr<DataSource>,
}

fn main() {
    let mut container = Container::new();

    // the same type can be registered multiple times, as long as qualifiers differ
    container
        .register_component::<DataSource, _>(vec![], |_| {
            Ok(DataSource {
                url: "postgres://primary",
            })
        })
        .expect("error registering primary DataSource");
    container
        .register(
            ComponentDescriptor::new::<DataSource, _>(vec![], |_| {
                Ok(DataSource {
                    url: "postgres://replica",
                })
            })
            .with_qualifier("replica"),
        )
        .expect("error registering replica DataSource");

    container
        .register_component::<ReportService, _>(
            vec![
                ComponentId::of::<DataSource>(),
                ComponentId::named::<DataSource>("replica"),
            ],
            |dependencies| {
                Ok(ReportService {
                    primary: dependencies.get(0)?,
                    replica: dependencies.get(1)?,
                })
            },
        )
        .expect("error registering ReportService");

    container.build().expect("error building container");

    let service = container
        .instance_typed::<ReportService>()
        .expect("error retrieving ReportService");

    // prints "postgres://primary postgres://replica"
    println!("{} {}", service.primary.url, service.replica.url);

    // all instances of a type, in construction order
    for data_source in container
        .instances_typed::<DataSource>()
        .expect("error retrieving data sources")
    {
        println!("{}", data_source.url);
    }
}
