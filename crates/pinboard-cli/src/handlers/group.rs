use anyhow::Context as _;
use pinboard_core::{Point, Rect};
use pinboard_domain::GroupId;

use crate::cli::{GroupAction, GroupBoundsArgs};
use crate::context::CliContext;
use crate::output;

pub async fn handle(ctx: &mut CliContext, action: GroupAction) -> anyhow::Result<()> {
    match action {
        GroupAction::Create(args) => {
            let group_id = ctx.session.create_group(bounds(args)).await?;
            output_group(ctx, group_id)
        }
        GroupAction::List => output::output_list(ctx.session.scene().groups.clone()),
        GroupAction::Rename { id, label } => {
            current_rect(ctx, id)?;
            ctx.session.rename_group(id, &label).await?;
            output_group(ctx, id)
        }
        GroupAction::Move { id, x, y } => {
            current_rect(ctx, id)?;
            ctx.session.move_group(id, Point::new(x, y)).await?;
            output_group(ctx, id)
        }
        GroupAction::Resize { id, width, height } => {
            let rect = current_rect(ctx, id)?;
            ctx.session
                .resize_group(id, Rect::new(rect.x, rect.y, width, height))
                .await?;
            output_group(ctx, id)
        }
        GroupAction::Delete { id } => {
            if !ctx.session.delete_group(id).await? {
                anyhow::bail!("Group not found: {}", id);
            }
            output::output_removed("deleted", id)
        }
    }
}

fn bounds(args: GroupBoundsArgs) -> Option<Rect> {
    Some(Rect::new(args.x?, args.y?, args.width?, args.height?))
}

fn current_rect(ctx: &CliContext, group_id: GroupId) -> anyhow::Result<Rect> {
    ctx.session
        .scene()
        .group(group_id)
        .map(|g| g.rect)
        .with_context(|| format!("Group not found on this tab: {}", group_id))
}

fn output_group(ctx: &CliContext, group_id: GroupId) -> anyhow::Result<()> {
    let group = ctx
        .session
        .scene()
        .group(group_id)
        .with_context(|| format!("Group not found on this tab: {}", group_id))?;
    output::output_success(group)
}
