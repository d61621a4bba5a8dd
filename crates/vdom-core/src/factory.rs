use crate::content::Content;
use crate::description::{cache_key, Description, Identifier};
use crate::instance::Instance;
use crate::props::Props;
use crate::runtime;

/// Instantiation factory.
///
/// Looks the pair (description, identifier) up in the cache of the instance
/// currently rendering. A hit is updated in place with `props` and `content`
/// and returned, keeping its hook state. A miss creates a fresh instance and,
/// when a parent is rendering, caches it there. Outside any render (the root)
/// nothing is cached.
///
/// Pass `()` as `id` when a description appears at most once under its
/// parent; repeated siblings need distinguishing identifiers. A child whose
/// key stops being requested is never torn down: it stays in the cache and its
/// effect cleanups do not run.
pub fn component(
    description: impl Into<Description>,
    props: Props,
    id: impl Into<Identifier>,
    content: impl Into<Content>,
) -> Instance {
    let description = description.into();
    let key = cache_key(&description, &id.into());
    let content = content.into();
    let parent = runtime::current_frame().map(|(instance, _)| instance);

    if let Some(existing) = parent.as_ref().and_then(|parent| parent.cached_child(&key)) {
        existing.update(props, content);
        return existing;
    }

    let instance = Instance::new(description, props, content);
    if let Some(parent) = parent {
        log::trace!("caching {key} under {}", parent.name());
        parent.cache_child(key, instance.clone());
    }
    instance
}
