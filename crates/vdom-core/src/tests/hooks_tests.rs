use super::*;
use crate::deps;
use crate::runtime_tests::Fixture;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

fn hooked<F>(name: &'static str, body: F) -> Instance
where
    F: Fn() -> Renderable + 'static,
{
    component(Description::named(name, move |_, _| body()), Props::new(), (), ())
}

#[test]
fn state_setter_identity_is_stable() {
    let fixture = Fixture::new();
    let setters: Rc<RefCell<Vec<StateSetter<i32>>>> = Rc::default();
    fixture.mount(hooked("Counter", {
        let setters = Rc::clone(&setters);
        move || {
            let (value, set_value) = use_state(0);
            setters.borrow_mut().push(set_value);
            Renderable::text(value)
        }
    }));
    for _ in 0..3 {
        fixture.rerender();
    }

    let setters = setters.borrow();
    assert_eq!(setters.len(), 4);
    assert!(setters.windows(2).all(|pair| pair[0] == pair[1]));
}

#[test]
fn lazy_initializer_runs_once() {
    let fixture = Fixture::new();
    let calls = Rc::new(Cell::new(0));
    fixture.mount(hooked("Lazy", {
        let calls = Rc::clone(&calls);
        move || {
            let (value, _) = use_state_with(|| {
                calls.set(calls.get() + 1);
                String::from("seed")
            });
            value.into()
        }
    }));
    fixture.rerender();
    fixture.rerender();

    assert_eq!(calls.get(), 1);
    assert_eq!(fixture.text(), "seed");
}

#[test]
fn setter_with_equal_value_does_not_schedule() {
    let fixture = Fixture::new();
    let setter: Rc<RefCell<Option<StateSetter<i32>>>> = Rc::default();
    fixture.mount(hooked("Five", {
        let setter = Rc::clone(&setter);
        move || {
            let (value, set_value) = use_state(5);
            *setter.borrow_mut() = Some(set_value);
            Renderable::text(value)
        }
    }));
    let set_value = setter.borrow().clone().expect("setter captured");

    set_value.set(5);
    assert!(!fixture.runtime.needs_render());
    assert_eq!(fixture.scheduler.frames(), 0);

    set_value.set(6);
    assert!(fixture.runtime.needs_render());
    assert_eq!(fixture.scheduler.frames(), 1);
    assert_eq!(set_value.get(), 6);
    assert_eq!(fixture.text(), "5", "write is only visible after the pass");
    assert!(fixture.tick());
    assert_eq!(fixture.text(), "6");
}

#[test]
fn effect_reruns_only_when_dependencies_change() {
    let fixture = Fixture::new();
    let log = Rc::new(RefCell::new(Vec::new()));
    let dep = Rc::new(Cell::new(1));
    fixture.mount(hooked("Effect", {
        let log = Rc::clone(&log);
        let dep = Rc::clone(&dep);
        move || {
            let a = dep.get();
            let log = Rc::clone(&log);
            use_effect(
                move || {
                    log.borrow_mut().push(format!("run {a}"));
                    move || log.borrow_mut().push(format!("cleanup {a}"))
                },
                deps![a],
            );
            Renderable::text(a)
        }
    }));
    assert_eq!(*log.borrow(), ["run 1"]);

    fixture.rerender();
    assert_eq!(*log.borrow(), ["run 1"], "same dependency is a no-op");

    dep.set(2);
    fixture.rerender();
    assert_eq!(*log.borrow(), ["run 1", "cleanup 1", "run 2"]);
}

#[test]
fn effect_without_dependency_list_runs_every_render() {
    let fixture = Fixture::new();
    let always = Rc::new(Cell::new(0));
    let once = Rc::new(Cell::new(0));
    fixture.mount(hooked("Effects", {
        let always = Rc::clone(&always);
        let once = Rc::clone(&once);
        move || {
            let always = Rc::clone(&always);
            let once = Rc::clone(&once);
            use_effect(move || always.set(always.get() + 1), Deps::always());
            use_effect(move || once.set(once.get() + 1), deps![]);
            "fx".into()
        }
    }));
    fixture.rerender();
    fixture.rerender();

    assert_eq!(always.get(), 3);
    assert_eq!(once.get(), 1);
}

#[test]
fn effect_may_set_state_for_the_next_pass() {
    let fixture = Fixture::new();
    fixture.mount(hooked("Loader", || {
        let (loaded, set_loaded) = use_state(false);
        use_effect(move || set_loaded.set(true), deps![]);
        Renderable::text(if loaded { "ready" } else { "loading" })
    }));
    assert_eq!(fixture.text(), "loading");
    assert_eq!(fixture.scheduler.frames(), 1);

    assert!(fixture.tick());
    assert_eq!(fixture.text(), "ready");
    assert!(!fixture.runtime.needs_render());
}

#[test]
fn callback_is_memoized_until_dependencies_change() {
    let fixture = Fixture::new();
    let seen: Rc<RefCell<Vec<Callback>>> = Rc::default();
    let dep = Rc::new(Cell::new(1));
    fixture.mount(hooked("Memo", {
        let seen = Rc::clone(&seen);
        let dep = Rc::clone(&dep);
        move || {
            let x = dep.get();
            let callback = use_callback(move || log::trace!("memo {x}"), deps![x]);
            seen.borrow_mut().push(callback);
            Renderable::text(x)
        }
    }));

    fixture.rerender();
    assert_eq!(seen.borrow()[0], seen.borrow()[1]);
    assert!(!fixture.runtime.needs_render());

    dep.set(2);
    fixture.rerender();
    assert_ne!(seen.borrow()[1], seen.borrow()[2]);
    assert!(
        fixture.runtime.needs_render(),
        "changed dependencies request another pass"
    );

    assert!(fixture.tick());
    assert_eq!(seen.borrow()[2], seen.borrow()[3]);
    assert!(!fixture.runtime.needs_render());
}

#[test]
fn slots_are_per_instance() {
    let fixture = Fixture::new();
    let item = |_: &Props, content: &Content| -> Renderable {
        let (count, _) = use_state(content.len());
        Renderable::text(count)
    };
    fixture.mount(hooked("Pair", move || {
        component(
            "div",
            Props::new(),
            (),
            content![
                component(Description::named("Item", item), Props::new(), 1, ()),
                component(Description::named("Item", item), Props::new(), 2, content!["a", "b"]),
            ],
        )
        .into()
    }));
    assert_eq!(fixture.text(), "02");
}

#[test]
fn changed_slot_type_reinitialises_slot() {
    let fixture = Fixture::new();
    let as_text = Rc::new(Cell::new(false));
    let root = hooked("Shifty", {
        let as_text = Rc::clone(&as_text);
        move || {
            if as_text.get() {
                let (value, _) = use_state(String::from("text"));
                value.into()
            } else {
                let (value, _) = use_state(7);
                Renderable::text(value)
            }
        }
    });
    fixture.mount(root.clone());
    assert_eq!(fixture.text(), "7");

    as_text.set(true);
    fixture.rerender();
    assert_eq!(fixture.text(), "text");
    assert_eq!(root.slot_count(), 1);
}

#[test]
#[should_panic(expected = "use_state called outside of a component render")]
fn state_hook_outside_render_panics() {
    let _ = use_state(0);
}

#[test]
#[should_panic(expected = "use_effect called outside of a component render")]
fn effect_hook_outside_render_panics() {
    use_effect(|| {}, deps![]);
}

#[test]
fn camel_case_aliases_share_slots() {
    let fixture = Fixture::new();
    let root = hooked("Alias", || {
        let (value, _) = useState(1);
        useEffect(|| {}, Deps::empty());
        let _ = useCallback(|| {}, Deps::empty());
        Renderable::text(value)
    });
    fixture.mount(root.clone());
    assert_eq!(root.slot_count(), 3);
}

#[test]
fn rebuilt_dependency_with_equal_contents_is_unchanged() {
    let fixture = Fixture::new();
    let runs = Rc::new(Cell::new(0));
    fixture.mount(hooked("Tags", {
        let runs = Rc::clone(&runs);
        move || {
            let tags = vec![String::from("a")];
            let runs = Rc::clone(&runs);
            use_effect(move || runs.set(runs.get() + 1), deps![tags]);
            "tags".into()
        }
    }));
    fixture.rerender();
    assert_eq!(runs.get(), 1);
}
