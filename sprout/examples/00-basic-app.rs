use sprout::application;
use sprout::runner::ApplicationRunner;
use sprout_di::component::{ComponentDescriptor, ComponentId};
use sprout_di::container::Container;
use sprout_di::instance_provider::{ComponentInstancePtr, ErrorPtr};

struct Greeter {
    greeting: String,
}

struct PrintGreetingRunner {
    greeter: ComponentInstancePtr<Greeter>,
}

// runners are ordinary components implementing ApplicationRunner
impl ApplicationRunner for PrintGreetingRunner {
    fn run(&self) -> Result<(), ErrorPtr> {
        println!("{}", self.greeter.greeting);
        Ok(())
    }
}

struct PrintFarewellRunner;

impl ApplicationRunner for PrintFarewellRunner {
    fn run(&self) -> Result<(), ErrorPtr> {
        println!("Bye!");
        Ok(())
    }

    // higher priorities run first
    fn priority(&self) -> i8 {
        -1
    }
}

// note: for the sake of simplicity, errors are unwrapped, rather than gracefully handled
fn main() {
    let mut container = Container::new();
    container
        .register_component::<PrintFarewellRunner, _>(vec![], |_| Ok(PrintFarewellRunner))
        .expect("error registering farewell runner");
    container
        .register_component::<PrintGreetingRunner, _>(
            vec![ComponentId::of::<Greeter>()],
            |dependencies| {
                Ok(PrintGreetingRunner {
                    greeter: dependencies.get(0)?,
                })
            },
        )
        .expect("error registering greeting runner");
    container
        .register(
            ComponentDescriptor::new::<Greeter, _>(vec![], |_| {
                Ok(Greeter {
                    greeting: "Hello world!".to_string(),
                })
            }),
        )
        .expect("error registering greeter");

    // config is read from sprout.json and SPROUT_* environment variables
    let mut application = application::create_default(container)
        .expect("unable to create default application")
        .with_runner::<PrintFarewellRunner>(ComponentId::of::<PrintFarewellRunner>())
        .with_runner::<PrintGreetingRunner>(ComponentId::of::<PrintGreetingRunner>());

    // prints "Hello world!" followed by "Bye!"
    application.run().expect("error running application");
}
