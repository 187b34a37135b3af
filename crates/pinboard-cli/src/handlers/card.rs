use anyhow::Context as _;
use pinboard_core::Point;
use pinboard_domain::image::content_type_for_extension;
use pinboard_domain::{Card, CardId, CardUpdate, FieldUpdate, PlacementId};

use crate::cli::{CardAction, CardAddArgs, CardUpdateArgs};
use crate::context::CliContext;
use crate::output;

pub async fn handle(ctx: &mut CliContext, action: CardAction) -> anyhow::Result<()> {
    match action {
        CardAction::Add(args) => {
            let placement_id = handle_add(ctx, args).await?;
            output_placed(ctx, placement_id)
        }
        CardAction::List => output::output_list(ctx.session.card_library().await?),
        CardAction::Update(args) => {
            let card = handle_update(ctx, args).await?;
            output::output_success(&card)
        }
        CardAction::Place { card_id, x, y } => {
            let placement_id = ctx.session.place_card(card_id, Point::new(x, y)).await?;
            output_placed(ctx, placement_id)
        }
        CardAction::Move { placement_id, x, y } => {
            require_placed(ctx, placement_id)?;
            ctx.session.move_card(placement_id, Point::new(x, y)).await?;
            output_placed(ctx, placement_id)
        }
        CardAction::Remove { placement_id } => {
            if !ctx.session.remove_placement(placement_id).await? {
                anyhow::bail!("Placement not found: {}", placement_id);
            }
            output::output_removed("removed", placement_id)
        }
        CardAction::Delete { card_id } => {
            if !ctx.session.delete_card_everywhere(card_id).await? {
                anyhow::bail!("Card not found: {}", card_id);
            }
            output::output_removed("deleted", card_id)
        }
        CardAction::SetImage { card_id, path } => {
            find_card(ctx, card_id).await?;
            let bytes = tokio::fs::read(&path)
                .await
                .with_context(|| format!("Failed to read image {}", path.display()))?;
            let extension = path.extension().and_then(|e| e.to_str()).unwrap_or_default();
            let filename = path.file_name().and_then(|n| n.to_str()).unwrap_or_default();
            ctx.session
                .set_card_image(card_id, bytes, content_type_for_extension(extension), filename)
                .await?;
            output::output_success(&find_card(ctx, card_id).await?)
        }
    }
}

async fn handle_add(ctx: &mut CliContext, args: CardAddArgs) -> anyhow::Result<PlacementId> {
    let session = &mut ctx.session;
    let placement_id = match (args.x, args.y) {
        (Some(x), Some(y)) => session.add_card_at(Point::new(x, y)).await?,
        _ => session.add_card_at_center().await?,
    };
    let updates = CardUpdate {
        title: args.title,
        description: args.description.map(FieldUpdate::Set).unwrap_or_default(),
        ..Default::default()
    };
    if !updates.is_empty() {
        let card_id = placed_card_id(ctx, placement_id)?;
        ctx.session.update_card(card_id, updates).await?;
    }
    Ok(placement_id)
}

async fn handle_update(ctx: &mut CliContext, args: CardUpdateArgs) -> anyhow::Result<Card> {
    find_card(ctx, args.id).await?;
    let description = if args.clear_description {
        FieldUpdate::Clear
    } else {
        args.description.map(FieldUpdate::Set).unwrap_or_default()
    };
    let updates = CardUpdate {
        title: args.title,
        description,
        ..Default::default()
    };
    ctx.session.update_card(args.id, updates).await?;
    find_card(ctx, args.id).await
}

async fn find_card(ctx: &CliContext, card_id: CardId) -> anyhow::Result<Card> {
    ctx.session
        .card_library()
        .await?
        .into_iter()
        .find(|c| c.id == card_id)
        .with_context(|| format!("Card not found: {}", card_id))
}

fn placed_card_id(ctx: &CliContext, placement_id: PlacementId) -> anyhow::Result<CardId> {
    Ok(require_placed(ctx, placement_id)?.card_id)
}

fn require_placed(
    ctx: &CliContext,
    placement_id: PlacementId,
) -> anyhow::Result<&pinboard_domain::canvas::CardNode> {
    ctx.session
        .scene()
        .card(placement_id)
        .with_context(|| format!("Placement not found on this tab: {}", placement_id))
}

fn output_placed(ctx: &CliContext, placement_id: PlacementId) -> anyhow::Result<()> {
    output::output_success(require_placed(ctx, placement_id)?)
}
