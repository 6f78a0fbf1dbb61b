//! `tracker-commands`: the activity service, its slash commands and the
//! text renderings posted back to the guild.

pub mod detection;
pub mod dispatch;
pub mod handlers;
pub mod registry;
pub mod render;
pub mod service;
pub mod types;

use std::sync::Arc;

pub use detection::detect_command;
pub use dispatch::{CommandContext, CommandDispatcher, CommandHandler, CommandResponse};
pub use handlers::{ServerActivityHandler, UserActivityHandler};
pub use registry::{builtin_commands, CommandRegistry, SERVER_ACTIVITY, USER_ACTIVITY};
pub use render::{
    render_departure_notice, render_join_notice, render_server_activity, render_user_activity,
    NOT_AVAILABLE,
};
pub use service::{ActivityService, Departure, ServerActivity, UserActivity};
pub use types::{ArgType, CommandArg, CommandDef, CommandInvocation};

/// Build a dispatcher wired with both activity commands.
pub fn build_dispatcher(service: Arc<ActivityService>) -> CommandDispatcher {
    let mut dispatcher = CommandDispatcher::new();
    dispatcher.register(
        USER_ACTIVITY,
        Arc::new(UserActivityHandler { service: service.clone() }),
    );
    dispatcher.register(SERVER_ACTIVITY, Arc::new(ServerActivityHandler { service }));
    dispatcher
}
