use crate::controller::context::ActionContext;
use crate::controller::dispatch::CommandFuture;
use crate::controller::view::{Transition, View};

/// Landing page after login.
pub fn index(_ctx: &mut ActionContext) -> CommandFuture<'_> {
    Box::pin(async move { Ok(Transition::forward(View::TOP_INDEX)) })
}
