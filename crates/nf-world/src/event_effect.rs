//! The `EventEffect` trait — what an event does when it fires.

use crate::{EffectResult, EventContext, WorldEffect, WorldHandle};

/// Pluggable event effect.
///
/// The common case is a plain [`WorldEffect`], which emits itself.  For
/// anything that depends on live state wrap a closure with [`effect_fn`].
///
/// Effects must be `Send + Sync` so a simulation instance can move between
/// threads; they hold no mutable state of their own.
///
/// # Example
///
/// ```rust,ignore
/// let howl = effect_fn(|ctx, world| {
///     let pack = if ctx.is_night() { 3 } else { 1 };
///     world.emit(&WorldEffect::new("spawn_mongrels").count(pack))
/// });
/// ```
pub trait EventEffect: Send + Sync + 'static {
    fn run(&self, ctx: &EventContext<'_>, world: &mut WorldHandle<'_>) -> EffectResult;
}

impl EventEffect for WorldEffect {
    fn run(&self, _ctx: &EventContext<'_>, world: &mut WorldHandle<'_>) -> EffectResult {
        world.emit(self)
    }
}

impl EventEffect for Vec<WorldEffect> {
    /// Emits every effect in order, stopping at the first error.
    fn run(&self, _ctx: &EventContext<'_>, world: &mut WorldHandle<'_>) -> EffectResult {
        self.iter().try_for_each(|e| world.emit(e))
    }
}

impl<E: EventEffect + ?Sized> EventEffect for Box<E> {
    fn run(&self, ctx: &EventContext<'_>, world: &mut WorldHandle<'_>) -> EffectResult {
        (**self).run(ctx, world)
    }
}

/// A closure-backed [`EventEffect`].  Build with [`effect_fn`].
pub struct FnEffect<F>(F);

impl<F> EventEffect for FnEffect<F>
where
    F: Fn(&EventContext<'_>, &mut WorldHandle<'_>) -> EffectResult + Send + Sync + 'static,
{
    fn run(&self, ctx: &EventContext<'_>, world: &mut WorldHandle<'_>) -> EffectResult {
        (self.0)(ctx, world)
    }
}

/// Wrap a closure as an [`EventEffect`].
pub fn effect_fn<F>(f: F) -> FnEffect<F>
where
    F: Fn(&EventContext<'_>, &mut WorldHandle<'_>) -> EffectResult + Send + Sync + 'static,
{
    FnEffect(f)
}
