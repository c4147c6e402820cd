use sprout_di::component::ComponentId;
use sprout_di::container::Container;
use sprout_di::instance_provider::{ComponentInstancePtr, TypedComponentInstanceProvider};

// a component without dependencies
struct EmailService;

impl EmailService {
    fn send(&self, to: &str) {
        println!("Sending welcome email to {to}");
    }
}

// a component depending on the one above
struct UserService {
    email_service: ComponentInstancePtr<EmailService>,
}

impl UserService {
    fn register(&self, name: &str) {
        self.email_service.send(name);
    }
}

// note: for the sake of simplicity, errors are unwrapped, rather than gracefully handled
fn main() {
    let mut container = Container::new();

    // registration order doesn't matter - the container figures out the construction order
    container
        .register_component::<UserService, _>(
            vec![ComponentId::of::<EmailService>()],
            |dependencies| {
                Ok(UserService {
                    // dependencies are passed in declared order
                    email_service: dependencies.get(0)?,
                })
            },
        )
        .expect("error registering UserService");
    container
        .register_component::<EmailService, _>(vec![], |_| Ok(EmailService))
        .expect("error registering EmailService");

    // constructs EmailService first, then UserService
    container.build().expect("error building container");

    let user_service = container
        .instance_typed::<UserService>()
        .expect("error retrieving UserService");

    // prints "Sending welcome email to alice"
    user_service.register("alice");
}
