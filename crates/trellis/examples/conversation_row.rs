//! Conversation Row Example
//!
//! Lays out an inbox row at a few widths and prints the resulting frames:
//! - avatar and unread badge keep their size
//! - the text column absorbs surplus and overflow
//! - the badge is pinned to a corner with a layout block
//!
//! Run with: RUST_LOG=trellis=trace cargo run -p trellis --example conversation_row

use tracing_subscriber::EnvFilter;
use trellis::{
    EdgeInsets, FlowBehavior, LayoutView, Rect, Size, StackAlignment, StackConfig, StackView,
    SubviewInfo, TreeStyle, ViewAccess, ViewTree, ViewTreeDebug,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let mut tree = ViewTree::new();

    // Text column: name over snippet, both free to shrink horizontally.
    let mut text_column = StackView::new(&mut tree, "text_column");
    let name = tree.create_leaf(
        "name",
        Size::new(140.0, 20.0),
        FlowBehavior::Compress,
        FlowBehavior::Fixed,
    );
    let snippet = tree.create_leaf(
        "snippet",
        Size::new(220.0, 18.0),
        FlowBehavior::Compress,
        FlowBehavior::Fixed,
    );
    let text_measurement = text_column.configure_with_subviews(
        &mut tree,
        StackConfig::vertical()
            .with_alignment(StackAlignment::Leading)
            .with_spacing(2.0),
        &[name, snippet],
    );

    // Row: avatar, text column, timestamp.
    let mut row = StackView::new(&mut tree, "row");
    let avatar = tree.create_view("avatar");
    let timestamp = tree.create_view("timestamp");
    row.configure_with_infos(
        &mut tree,
        StackConfig::horizontal()
            .with_alignment(StackAlignment::Center)
            .with_spacing(12.0)
            .with_margins(EdgeInsets::symmetric(16.0, 10.0)),
        &[avatar, text_column.id(), timestamp],
        vec![
            SubviewInfo::fixed(Size::new(48.0, 48.0)),
            SubviewInfo::flexible(text_measurement.total_size()),
            SubviewInfo::fixed(Size::new(36.0, 14.0)),
        ],
    );

    // Unread badge pinned to the avatar's top-right corner.
    let badge = tree.create_view("badge");
    row.surface_mut().add_child(&mut tree, badge, move |access, _| {
        if let Some(frame) = access.get_frame(avatar) {
            let corner = Rect::new(frame.right() - 12.0, frame.top() - 4.0, 16.0, 16.0);
            LayoutView::set_subview_frame(access, badge, corner);
        }
    });

    tracing::info!(size = ?row.size_that_fits(&tree), "row measured");

    for width in [320.0, 420.0, 260.0] {
        let height = row.size_that_fits(&tree).height;
        tree.set_frame(row.id(), Rect::new(0.0, 0.0, width, height))?;
        row.layout_if_needed(&mut tree);
        text_column.layout_if_needed(&mut tree);

        println!("width {width}:");
        let dump = ViewTreeDebug::new()
            .style(TreeStyle::Ascii)
            .show_ids(false)
            .show_frames(true)
            .format_subtree(&tree, row.id())?;
        println!("{dump}");
    }

    Ok(())
}
