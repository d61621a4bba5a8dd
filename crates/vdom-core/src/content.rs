use std::fmt;

use crate::instance::Instance;

/// Output of a composite function, or one child of a primitive.
///
/// Anything that is not an [`Instance`] is rendered as a text node.
#[derive(Clone, Debug)]
pub enum Renderable {
    Text(String),
    Instance(Instance),
}

impl Renderable {
    pub fn text(value: impl fmt::Display) -> Self {
        Renderable::Text(value.to_string())
    }
}

impl From<Instance> for Renderable {
    fn from(instance: Instance) -> Self {
        Renderable::Instance(instance)
    }
}

impl From<&Instance> for Renderable {
    fn from(instance: &Instance) -> Self {
        Renderable::Instance(instance.clone())
    }
}

impl From<String> for Renderable {
    fn from(text: String) -> Self {
        Renderable::Text(text)
    }
}

impl From<&String> for Renderable {
    fn from(text: &String) -> Self {
        Renderable::Text(text.clone())
    }
}

impl From<&str> for Renderable {
    fn from(text: &str) -> Self {
        Renderable::Text(text.to_owned())
    }
}

macro_rules! display_renderable {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for Renderable {
                fn from(value: $ty) -> Self {
                    Renderable::text(value)
                }
            }

            impl From<$ty> for Content {
                fn from(value: $ty) -> Self {
                    Content::Single(Renderable::text(value))
                }
            }
        )*
    };
}

display_renderable!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64, bool, char);

/// Children supplied by a parent: one value or an ordered list.
#[derive(Clone, Debug)]
pub enum Content {
    Single(Renderable),
    List(Vec<Renderable>),
}

impl Default for Content {
    fn default() -> Self {
        Content::List(Vec::new())
    }
}

impl Content {
    pub fn list<I, R>(items: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: Into<Renderable>,
    {
        Content::List(items.into_iter().map(Into::into).collect())
    }

    /// Content normalized to a sequence: a single value becomes a one-element slice.
    pub fn items(&self) -> &[Renderable] {
        match self {
            Content::Single(item) => std::slice::from_ref(item),
            Content::List(items) => items,
        }
    }

    pub fn len(&self) -> usize {
        self.items().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items().is_empty()
    }
}

impl From<()> for Content {
    fn from(_: ()) -> Self {
        Content::default()
    }
}

impl From<Renderable> for Content {
    fn from(item: Renderable) -> Self {
        Content::Single(item)
    }
}

impl From<Instance> for Content {
    fn from(instance: Instance) -> Self {
        Content::Single(Renderable::Instance(instance))
    }
}

impl From<String> for Content {
    fn from(text: String) -> Self {
        Content::Single(Renderable::Text(text))
    }
}

impl From<&String> for Content {
    fn from(text: &String) -> Self {
        Content::Single(Renderable::Text(text.clone()))
    }
}

impl From<&str> for Content {
    fn from(text: &str) -> Self {
        Content::Single(Renderable::Text(text.to_owned()))
    }
}

impl From<Vec<Renderable>> for Content {
    fn from(items: Vec<Renderable>) -> Self {
        Content::List(items)
    }
}

impl From<Vec<Instance>> for Content {
    fn from(items: Vec<Instance>) -> Self {
        Content::list(items)
    }
}

/// Build a [`Content::List`] from values of mixed types.
///
/// ```ignore
/// content!["Count: ", count, button(props, (), "+1")]
/// ```
#[macro_export]
macro_rules! content {
    ($($item:expr),* $(,)?) => {
        $crate::Content::List(vec![$($crate::Renderable::from($item)),*])
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_content_normalizes_to_one_item() {
        let content = Content::from("hello");
        assert_eq!(content.len(), 1);
        assert!(matches!(&content.items()[0], Renderable::Text(text) if text == "hello"));
    }

    #[test]
    fn content_macro_mixes_text_and_numbers() {
        let content = content!["Count: ", 5, 'x'];
        let texts: Vec<_> = content
            .items()
            .iter()
            .map(|item| match item {
                Renderable::Text(text) => text.clone(),
                Renderable::Instance(_) => unreachable!(),
            })
            .collect();
        assert_eq!(texts, ["Count: ", "5", "x"]);
        assert!(Content::default().is_empty());
    }
}
