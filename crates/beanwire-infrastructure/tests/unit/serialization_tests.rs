//! Serialization Facility Tests

use beanwire_domain::error::Error;
use beanwire_domain::ports::SerializationFacility;
use beanwire_domain::value_objects::BeanId;
use beanwire_infrastructure::infrastructure::{PermissiveSerialization, SerdeSerializationFacility};
use serde::{Serialize, Serializer};
use std::any::Any;
use std::collections::HashMap;

#[derive(Serialize)]
struct Cart {
    items: Vec<String>,
}

/// Map keys that JSON cannot represent
#[derive(Serialize)]
struct Ledger {
    entries: HashMap<(u8, u8), u32>,
}

struct Socket;

impl Serialize for Socket {
    fn serialize<S: Serializer>(&self, _serializer: S) -> Result<S::Ok, S::Error> {
        Err(serde::ser::Error::custom("sockets cannot be serialized"))
    }
}

fn check(facility: &dyn SerializationFacility, value: &(dyn Any + Send + Sync)) -> beanwire_domain::error::Result<()> {
    facility.check_serializable(&BeanId::new("Bean"), value)
}

#[test]
fn test_registered_type_is_serializable() {
    let facility = SerdeSerializationFacility::new().with_type::<Cart>();
    let cart = Cart {
        items: vec!["book".to_string()],
    };

    assert!(facility.is_registered::<Cart>());
    assert!(check(&facility, &cart).is_ok());
}

#[test]
fn test_unregistered_type_is_rejected() {
    let facility = SerdeSerializationFacility::new().with_type::<Cart>();

    let err = check(&facility, &42_u32).unwrap_err();

    assert!(matches!(err, Error::NotSerializable { ref bean, .. } if bean == "Bean"));
}

#[test]
fn test_serialization_failure_is_rejected() {
    let mut facility = SerdeSerializationFacility::new();
    facility.register::<Socket>();
    facility.register::<Ledger>();
    assert_eq!(facility.len(), 2);

    let ledger = Ledger {
        entries: HashMap::from([((1, 2), 3)]),
    };

    assert!(matches!(
        check(&facility, &Socket),
        Err(Error::NotSerializable { .. })
    ));
    assert!(matches!(
        check(&facility, &ledger),
        Err(Error::NotSerializable { .. })
    ));
}

#[test]
fn test_permissive_accepts_everything() {
    assert!(check(&PermissiveSerialization, &Socket).is_ok());
    assert!(check(&PermissiveSerialization, &()).is_ok());
    assert!(SerdeSerializationFacility::new().is_empty());
}
