use std::sync::Arc;

use crate::{
    action::ActionTrigger,
    core::{events::EventKind, Context},
    interaction::{InteractionCore, InteractionOrigin},
};

/// Run the button or select menu action with the given custom id.
///
/// Returns whether an action was run.
pub async fn dispatch_component(
    ctx: Arc<Context>,
    origin: InteractionOrigin,
    custom_id: &str,
    values: Vec<String>,
) -> bool {
    let Some(action) = ctx.actions().component(custom_id) else {
        debug!(custom_id, "No registered action for component");

        return false;
    };

    EventKind::Component.log(&origin, custom_id);

    let trigger = ActionTrigger::Component {
        core: InteractionCore::from_interaction(Arc::clone(&ctx), origin),
        values,
    };

    if let Err(err) = action.run(ctx, trigger).await {
        let wrap = format!("Failed to process component `{custom_id}`");
        error!("{:?}", err.wrap_err(wrap));
    }

    true
}
