//! Behavioural tests for generated builders.

use std::cell::Cell;
use std::rc::Rc;

use rstest::rstest;

use optbuilder as runtime;

#[optbuilder::generate]
mod addresses {
    use optbuilder::DefaultValueProvider;

    #[provides]
    pub struct StateProvider;

    impl DefaultValueProvider<String> for StateProvider {
        fn get(&self) -> String {
            "NY".to_owned()
        }
    }

    #[builder]
    #[derive(Debug, PartialEq, Eq)]
    pub struct Address {
        #[optional]
        pub street: Option<String>,
        #[optional(default)]
        pub town: String,
        #[optional(provider = StateProvider)]
        pub state: String,
    }
}

#[optbuilder::generate]
mod enums {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum Speed {
        Slow,
        Medium,
        Fast,
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum Lone {
        Only,
    }

    #[builder]
    #[derive(Debug)]
    pub struct Fan {
        #[optional]
        pub inferred: Speed,
        #[optional(enumerable)]
        pub first: Speed,
        #[optional(enumerable = "last")]
        pub last: Speed,
        #[optional(enumerable = "last")]
        pub lone: Lone,
        #[optional(enumerable)]
        pub maybe: Option<Speed>,
    }
}

thread_local! {
    /// Counts calls to the name provider.
    pub static NAME_CALLS: Cell<usize> = const { Cell::new(0) };
    /// Counts calls to the port provider.
    pub static PORT_CALLS: Cell<usize> = const { Cell::new(0) };
}

fn calls(counter: &'static std::thread::LocalKey<Cell<usize>>) -> usize {
    counter.with(Cell::get)
}

#[optbuilder::generate]
mod services {
    use optbuilder::DefaultValueProvider;

    #[provides]
    pub struct Names;

    impl DefaultValueProvider<String> for Names {
        fn get(&self) -> String {
            crate::NAME_CALLS.with(|calls| calls.set(calls.get() + 1));
            "anonymous".to_owned()
        }
    }

    #[derive(Default)]
    #[provides]
    pub struct Ports {
        base: u16,
    }

    impl DefaultValueProvider<u16> for Ports {
        fn get(&self) -> u16 {
            crate::PORT_CALLS.with(|calls| calls.set(calls.get() + 1));
            self.base + 8080
        }
    }

    #[builder(name = "ServiceFactory")]
    #[derive(Debug)]
    pub struct Service {
        pub id: u32,
        #[optional]
        pub name: String,
        #[optional]
        #[setter(name = "listen_on")]
        pub port: u16,
        #[optional]
        pub retries: u8,
        #[optional]
        pub tags: Vec<String>,
        #[optional(default = 1.5)]
        pub ratio: f64,
    }
}

#[optbuilder::generate(crate = "crate::runtime")]
mod renamed_runtime {
    pub mod inner {
        #[builder]
        pub struct Flag {
            #[optional]
            pub on: bool,
        }
    }
}

#[optbuilder::generate]
mod accounts {
    use optbuilder::DefaultValueProvider;

    #[provides]
    pub struct Greeting;

    impl DefaultValueProvider<String> for Greeting {
        fn get(&self) -> String {
            "guest".to_owned()
        }
    }

    pub mod profiles {
        #[builder]
        #[derive(Debug)]
        pub struct User {
            pub id: u8,
            #[optional]
            pub name: String,
            #[optional(nullable)]
            pub nickname: Option<Option<String>>,
            #[optional]
            pub limit: Option<Option<u8>>,
        }
    }
}

mod declared {
    #[derive(optbuilder::Declare)]
    #[builder]
    pub struct Marked {
        #[optional(nullable)]
        #[setter(name = "with_value")]
        pub value: Option<u8>,
    }
}

#[rstest]
fn address_defaults_when_nothing_is_set() {
    let address = addresses::AddressBuilder::new().build();
    assert_eq!(
        address,
        addresses::Address {
            street: None,
            town: String::new(),
            state: "NY".to_owned(),
        }
    );
}

#[rstest]
fn address_setters_override_defaults() {
    let address = addresses::AddressBuilder::create(|b| {
        b.street(|| Some("Main St".to_owned()))
            .state(|| "CA".to_owned());
    });
    assert_eq!(address.street.as_deref(), Some("Main St"));
    assert_eq!(address.state, "CA");
    assert_eq!(address.town, "");
}

#[rstest]
fn builders_without_mandatory_parameters_implement_default() {
    let address = addresses::AddressBuilder::default().build();
    assert_eq!(address.state, "NY");
}

#[rstest]
fn enum_defaults_follow_position() {
    let fan = enums::FanBuilder::new().build();
    assert_eq!(fan.inferred, enums::Speed::Slow);
    assert_eq!(fan.first, enums::Speed::Slow);
    assert_eq!(fan.last, enums::Speed::Fast);
    assert_eq!(fan.lone, enums::Lone::Only);
    assert_eq!(fan.maybe, Some(enums::Speed::Slow));
}

#[rstest]
fn providers_run_only_for_unset_parameters() {
    let before_names = calls(&NAME_CALLS);
    let before_ports = calls(&PORT_CALLS);

    let mut builder = services::ServiceFactory::new(7);
    builder.name(|| "api".to_owned());
    let service = builder.build();

    assert_eq!(service.id, 7);
    assert_eq!(service.name, "api");
    assert_eq!(service.port, 8080);
    assert_eq!(calls(&NAME_CALLS), before_names);
    assert_eq!(calls(&PORT_CALLS), before_ports + 1);
}

#[rstest]
fn literal_and_initializer_defaults() {
    let service = services::ServiceFactory::create(1, |b| {
        b.listen_on(|| 9000);
    });
    assert_eq!(service.port, 9000);
    assert_eq!(service.name, "anonymous");
    assert_eq!(service.retries, 0);
    assert!(service.tags.is_empty());
    assert_eq!(service.ratio.to_bits(), 1.5_f64.to_bits());
}

#[rstest]
fn setter_callbacks_run_at_build_time() {
    let evaluated = Rc::new(Cell::new(0_u32));
    let seen = Rc::clone(&evaluated);
    let mut builder = services::ServiceFactory::new(3);
    builder.retries(move || {
        seen.set(seen.get() + 1);
        5
    });
    assert_eq!(evaluated.get(), 0);
    let service = builder.build();
    assert_eq!(evaluated.get(), 1);
    assert_eq!(service.retries, 5);
}

#[rstest]
fn configured_runtime_path_and_nested_modules() {
    let mut builder = renamed_runtime::inner::FlagBuilder::new();
    assert!(!renamed_runtime::inner::FlagBuilder::new().build().on);
    builder.on(|| true);
    assert!(builder.build().on);
}

#[rstest]
fn providers_in_parent_modules_serve_nested_aggregates() {
    let user = accounts::profiles::UserBuilder::new(1).build();
    assert_eq!(user.name, "guest");
    assert_eq!(user.nickname, None);
    assert_eq!(user.limit, None);
    let mut builder = accounts::profiles::UserBuilder::new(2);
    builder.nickname(|| Some(None)).limit(|| Some(Some(3)));
    let configured = builder.build();
    assert_eq!(configured.id, 2);
    assert_eq!(configured.nickname, Some(None));
    assert_eq!(configured.limit, Some(Some(3)));
}

#[rstest]
fn builder_debug_hides_pending_values() {
    let rendered = format!("{:?}", addresses::AddressBuilder::new());
    assert!(rendered.starts_with("AddressBuilder"));
}

#[rstest]
fn supplied_values_resolve_in_place() {
    let ready = runtime::Supplied::ready(3);
    assert!(!ready.is_deferred());
    assert_eq!(ready.resolve(), 3);
    let deferred = runtime::Supplied::deferred(|| 4);
    assert!(deferred.is_deferred());
    assert_eq!(format!("{deferred:?}"), "Deferred(..)");
    assert_eq!(deferred.resolve(), 4);
}

#[rstest]
fn declare_accepts_markers_outside_generated_modules() {
    let marked = declared::Marked { value: Some(2) };
    assert_eq!(marked.value, Some(2));
}
