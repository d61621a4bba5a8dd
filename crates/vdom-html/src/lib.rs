//! Element wrappers over [`vdom_core::component`].
//!
//! Each function instantiates the primitive of the same tag name under the
//! instance currently rendering, so `div(props, id, content)` is shorthand
//! for `component("div", props, id, content)`.

use vdom_core::{component, Content, Identifier, Instance, Props};

macro_rules! elements {
    ($($(#[$meta:meta])* $name:ident),* $(,)?) => {
        $(
            $(#[$meta])*
            pub fn $name(
                props: Props,
                id: impl Into<Identifier>,
                content: impl Into<Content>,
            ) -> Instance {
                component(stringify!($name), props, id, content)
            }
        )*

        /// Tag names with a wrapper in this crate.
        pub const TAGS: &[&str] = &[$(stringify!($name)),*];
    };
}

elements! {
    div,
    span,
    /// Clickable element; pair it with `Props::on("click", ...)`.
    button,
    h1,
    h2,
    h3,
    p,
    ul,
    li,
}
