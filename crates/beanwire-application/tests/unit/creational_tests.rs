//! Tests for the create/destroy protocol and creational contexts

use crate::support::{Counters, Widget, counted_bean};
use beanwire_application::contexts::same_instance;
use beanwire_application::{ContextualType, CreationalContext, FnContextual, Instance};
use beanwire_domain::entities::BeanMetadata;
use beanwire_domain::error::Error;
use beanwire_domain::value_objects::{BeanId, ScopeKind};
use std::sync::{Arc, Mutex};

fn widget(serial: usize) -> Instance {
    Arc::new(Widget { serial })
}

#[test]
fn test_push_allowed_once() {
    let creational = CreationalContext::for_bean(BeanId::new("A"));
    creational.push(widget(1)).unwrap();

    let second = creational.push(widget(2));

    assert!(matches!(second, Err(Error::Creation { .. })));
}

#[test]
fn test_create_must_return_pushed_instance() {
    let honest = ContextualType::from_fn(BeanMetadata::new("Honest", ScopeKind::Dependent), |cc| {
        let instance = widget(1);
        cc.push(instance.clone())?;
        Ok(instance)
    });
    let dishonest = ContextualType::from_fn(BeanMetadata::new("Dishonest", ScopeKind::Dependent), |cc| {
        cc.push(widget(1))?;
        Ok(widget(2))
    });

    assert!(honest.create_instance(&CreationalContext::for_bean("Honest".into())).is_ok());
    let result = dishonest.create_instance(&CreationalContext::for_bean("Dishonest".into()));
    assert!(matches!(result, Err(Error::Creation { .. })));
}

#[test]
fn test_incomplete_instance_visible_to_descendants() {
    let root = CreationalContext::for_bean(BeanId::new("A"));
    let pushed = widget(7);
    root.push(pushed.clone()).unwrap();
    let grandchild = root.child(&BeanId::new("B")).child(&BeanId::new("C"));

    let found = grandchild.incomplete_instance_of(&BeanId::new("A")).unwrap();

    assert!(same_instance(&found, &pushed));
    assert!(grandchild.incomplete_instance_of(&BeanId::new("B")).is_none());
}

#[test]
fn test_release_destroys_dependents_in_reverse_order_once() {
    let order = Arc::new(Mutex::new(Vec::new()));
    let make = |name: &'static str| {
        let order = order.clone();
        Arc::new(ContextualType::new(
            BeanMetadata::new(name, ScopeKind::Dependent),
            FnContextual::new(|_| Ok(widget(0))).on_destroy(move |_| {
                order.lock().unwrap().push(name);
                Ok(())
            }),
        ))
    };
    let first = make("first");
    let second = make("second");
    let parent = CreationalContext::new();
    for contextual in [&first, &second] {
        let child = parent.child(contextual.id());
        let instance = contextual.create_instance(&child).unwrap();
        parent.add_dependent(contextual.clone(), instance, child);
    }

    parent.release();
    parent.release();

    assert_eq!(*order.lock().unwrap(), vec!["second", "first"]);
    assert!(parent.is_released());
    assert_eq!(parent.dependent_count(), 0);
}

#[test]
fn test_destroy_failures_and_panics_do_not_escape() {
    let failing = Arc::new(ContextualType::new(
        BeanMetadata::new("Failing", ScopeKind::Dependent),
        FnContextual::new(|_| Ok(widget(0)))
            .on_destroy(|_| Err(Error::internal("cannot close"))),
    ));
    let panicking = Arc::new(ContextualType::new(
        BeanMetadata::new("Panicking", ScopeKind::Dependent),
        FnContextual::new(|_| Ok(widget(0))).on_destroy(|_| panic!("destroy panic")),
    ));
    let parent = CreationalContext::new();
    for contextual in [&failing, &panicking] {
        let child = parent.child(contextual.id());
        let instance = contextual.create_instance(&child).unwrap();
        parent.add_dependent(contextual.clone(), instance, child);
    }

    parent.release();

    assert!(parent.is_released());
}

#[test]
fn test_destroy_dependent_early() {
    let counters = Counters::default();
    let contextual = Arc::new(counted_bean(
        BeanMetadata::new("Transient", ScopeKind::Dependent),
        &counters,
    ));
    let parent = CreationalContext::new();
    let child = parent.child(contextual.id());
    let instance = contextual.create_instance(&child).unwrap();
    parent.add_dependent(contextual.clone(), instance.clone(), child);

    assert!(parent.destroy_dependent(&instance));
    assert!(!parent.destroy_dependent(&instance));
    parent.release();

    assert_eq!(counters.destroyed(), 1);
}

#[test]
fn test_destroy_instance_releases_nested_dependents() {
    let counters = Counters::default();
    let inner = Arc::new(counted_bean(
        BeanMetadata::new("Inner", ScopeKind::Dependent),
        &counters,
    ));
    let outer_cc = CreationalContext::for_bean(BeanId::new("Outer"));
    let nested = outer_cc.child(inner.id());
    let inner_instance = inner.create_instance(&nested).unwrap();
    outer_cc.add_dependent(inner.clone(), inner_instance, nested);
    let outer = ContextualType::from_fn(BeanMetadata::new("Outer", ScopeKind::Request), |_| {
        Ok(widget(0))
    });

    outer.destroy_instance(widget(0), &outer_cc);

    assert_eq!(counters.destroyed(), 1);
    assert!(outer_cc.is_released());
}
