use anyhow::Context as _;
use pinboard_domain::{ConnectionId, ConnectionUpdate, FieldUpdate};

use crate::cli::ConnectionAction;
use crate::context::CliContext;
use crate::output;

pub async fn handle(ctx: &mut CliContext, action: ConnectionAction) -> anyhow::Result<()> {
    match action {
        ConnectionAction::Create {
            from,
            to,
            label,
            color,
        } => {
            let connection_id = ctx
                .session
                .create_connection(from, to, label, color)
                .await?;
            output_connection(ctx, connection_id)
        }
        ConnectionAction::List => output::output_list(ctx.session.scene().connections.clone()),
        ConnectionAction::Update {
            id,
            label,
            clear_label,
            color,
        } => {
            let label = if clear_label {
                FieldUpdate::Clear
            } else {
                label.map(FieldUpdate::Set).unwrap_or_default()
            };
            if !ctx
                .session
                .update_connection(id, ConnectionUpdate { label, color })
                .await?
                && ctx.session.scene().connection(id).is_none()
            {
                anyhow::bail!("Connection not found: {}", id);
            }
            output_connection(ctx, id)
        }
        ConnectionAction::Delete { id } => {
            if !ctx.session.delete_connection(id).await? {
                anyhow::bail!("Connection not found: {}", id);
            }
            output::output_removed("deleted", id)
        }
    }
}

fn output_connection(ctx: &CliContext, connection_id: ConnectionId) -> anyhow::Result<()> {
    let connection = ctx
        .session
        .scene()
        .connection(connection_id)
        .with_context(|| format!("Connection not found on this tab: {}", connection_id))?;
    output::output_success(connection)
}
