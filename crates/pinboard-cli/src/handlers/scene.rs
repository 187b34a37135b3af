use serde::Serialize;

use pinboard_domain::canvas::{Scene, Viewport};
use pinboard_domain::{Board, Tab};

use crate::context::CliContext;
use crate::output;

#[derive(Serialize)]
struct SceneView<'a> {
    board: &'a Board,
    tab: &'a Tab,
    viewport: Viewport,
    #[serde(flatten)]
    scene: &'a Scene,
}

pub fn handle(ctx: &CliContext) -> anyhow::Result<()> {
    let session = &ctx.session;
    output::output_success(SceneView {
        board: session.board(),
        tab: session.tab(),
        viewport: session.viewport(),
        scene: session.scene(),
    })
}
