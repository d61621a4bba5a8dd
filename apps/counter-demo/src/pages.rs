//! The two demo pages: a counter page and a two-section layout.

use vdom_core::{
    component, content, deps, use_callback, use_effect, use_state, Content, Props, Renderable,
};
use vdom_html::{button, div, h1, h2, p};

use crate::interval::set_interval;

const INTERVAL_SECONDS: u32 = 2;

pub fn counter_page(_: &Props, _: &Content) -> Renderable {
    let (count, set_count) = use_state(10);
    use_effect(
        move || {
            log::info!("counter page effect");
            set_interval(INTERVAL_SECONDS, move || set_count.update(|c| c + 1));
        },
        deps![],
    );

    div(
        Props::new(),
        (),
        content![
            component(counter_header, Props::new(), (), ()),
            div(
                Props::new().class_names("main"),
                (),
                content![
                    h2(Props::new(), 1, "Section 1"),
                    p(Props::new(), 1, "This is an example paragraph"),
                    h2(Props::new(), 2, "Section 2"),
                    p(
                        Props::new(),
                        2,
                        format!("Feeling bored...? Here's the current count: {count}"),
                    ),
                ],
            ),
            component(footer, Props::new(), (), ()),
        ],
    )
    .into()
}

fn counter_header(_: &Props, _: &Content) -> Renderable {
    let (count, set_count) = use_state(10);
    use_effect(
        move || {
            log::info!("header effect");
            set_interval(INTERVAL_SECONDS, move || set_count.update(|c| c + 1));
        },
        deps![],
    );

    h1(
        Props::new().class_names(["header"]),
        (),
        format!("Hello world - {count}"),
    )
    .into()
}

pub fn sections_page(_: &Props, _: &Content) -> Renderable {
    div(
        Props::new(),
        (),
        content![
            component(sections_header, Props::new(), (), ()),
            div(
                Props::new().class_names("main"),
                "body",
                content![
                    component(left_section, Props::new(), (), ()),
                    component(right_section, Props::new(), (), ()),
                ],
            ),
            component(footer, Props::new(), (), ()),
        ],
    )
    .into()
}

fn sections_header(_: &Props, _: &Content) -> Renderable {
    div(
        Props::new().class_names(["header"]),
        (),
        content![
            div(Props::new().class_names(["left-header"]), "left", "My title"),
            div(Props::new().class_names(["right-header"]), "right", "Right menu"),
        ],
    )
    .into()
}

fn left_section(_: &Props, _: &Content) -> Renderable {
    let (count, set_count) = use_state(10);
    let reset = use_callback(
        {
            let set_count = set_count.clone();
            move || set_count.set(10)
        },
        deps![],
    );
    use_effect(
        move || set_interval(INTERVAL_SECONDS, move || set_count.update(|i| i + 1)),
        deps![],
    );

    div(
        Props::new().class_names(["left-section"]),
        1,
        content![
            div(Props::new(), 2, format!("Left section: {count}")),
            button(Props::new().on("click", reset), (), "Reset"),
        ],
    )
    .into()
}

fn right_section(_: &Props, _: &Content) -> Renderable {
    let (texts, set_texts) = use_state(Vec::<String>::new());
    let add_line = use_callback(
        {
            let texts = texts.clone();
            move || {
                let mut next = vec![String::from("Lorem ipsum...")];
                next.extend(texts.iter().cloned());
                set_texts.set(next);
            }
        },
        deps![texts],
    );

    let mut children = vec![Renderable::from(div(Props::new(), "text", "Right section"))];
    children.extend(
        texts
            .iter()
            .enumerate()
            .map(|(idx, text)| Renderable::from(div(Props::new(), idx, format!("{idx}. {text}")))),
    );
    children.push(button(Props::new().on("click", add_line), (), "Add line").into());
    div(Props::new().class_names(["right-section"]), "main", children).into()
}

fn footer(_: &Props, _: &Content) -> Renderable {
    div(Props::new().class_names(["footer"]), (), "Footer").into()
}
