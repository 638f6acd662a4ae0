//! End-to-end exploration of a small clustering run.

mod common;

use dendra_core::{
    Color, CutLineController, DragState, Explorer, ExplorerBuilder, HitTarget, Palette, Point,
    PointerEvent, ViewMode, Viewport, generated_color,
};
use rstest::{fixture, rstest};

#[fixture]
fn explorer() -> Explorer {
    ExplorerBuilder::new(common::points())
        .with_tree(common::tree())
        .with_steps(common::steps())
        .with_viewport(Viewport::new(800.0, 600.0))
        .build()
        .expect("scenario is valid")
}

#[rstest]
fn replay_walks_from_unclustered_to_one_cluster(explorer: Explorer) {
    let counts: Vec<Option<usize>> = (0..=explorer.replayable_step_count())
        .map(|step| {
            explorer
                .scene(ViewMode::Replay { step })
                .partition
                .map(|partition| partition.len())
        })
        .collect();
    assert_eq!(counts, vec![None, None, Some(3), Some(2), Some(1)]);
}

#[rstest]
fn dragging_the_cut_line_reclusters(explorer: Explorer) {
    let controller = CutLineController::new(explorer.height_scale(400.0));
    let mut drag = DragState::new(explorer.default_cut_height());

    // Halfway along the 120..247.5 band.
    let height = controller
        .handle(&mut drag, PointerEvent::Down { x: 183.75 })
        .expect("press inside the canvas moves the cut");
    assert_eq!(height, 10.0);
    let scene = explorer.scene(ViewMode::Cut { height });
    assert_eq!(
        scene.partition.map(|partition| partition.into_clusters()),
        Some(vec![vec![0, 1, 2], vec![3]])
    );

    let height = controller
        .handle(&mut drag, PointerEvent::Move { x: 0.0 })
        .expect("dragging left lowers the cut");
    assert_eq!(height, 0.0);
    assert_eq!(explorer.scene(ViewMode::Cut { height }).cluster_count(), 4);

    assert_eq!(controller.handle(&mut drag, PointerEvent::Leave), None);
    assert_eq!(controller.handle(&mut drag, PointerEvent::Move { x: 300.0 }), None);
    assert_eq!(drag.cut_height, 0.0);
}

#[rstest]
fn hovering_reports_points_and_circles(explorer: Explorer) {
    let scene = explorer.scene(ViewMode::Cut { height: 2.0 });
    let origin = scene.point_pixels[0];
    assert_eq!(explorer.hover(&scene, origin), Some(HitTarget::Point(0)));

    let circle = scene.layout.get(1).expect("outlier cluster has a circle");
    let edge = Point::new(circle.center.x, circle.center.y + circle.radius - 1.0);
    assert_eq!(explorer.hover(&scene, edge), Some(HitTarget::Cluster(1)));
}

#[rstest]
fn summaries_follow_the_cut(explorer: Explorer) {
    let scene = explorer.scene(ViewMode::Cut { height: 2.0 });
    let partition = scene.partition.expect("tree is present");
    let summaries = explorer.cluster_summaries(&partition);
    let means: Vec<Option<f64>> = summaries
        .iter()
        .map(|summary| summary.means.get("age").copied())
        .collect();
    assert_eq!(means, vec![Some(40.0), Some(70.0)]);
}

#[rstest]
fn dendrogram_grows_with_the_replay(explorer: Explorer) {
    let labels: Vec<String> = explorer
        .dendrogram(400.0, 600.0, 0)
        .rows
        .ordered()
        .iter()
        .map(|(label, _)| label.clone())
        .collect();
    assert_eq!(labels, ["P0", "P1", "P2", "P3"]);

    let segment_counts: Vec<usize> = (0..=4)
        .map(|step| explorer.dendrogram(400.0, 600.0, step).segments.len())
        .collect();
    assert_eq!(segment_counts, vec![0, 1, 2, 3, 3]);
}

#[test]
fn custom_palette_colors_clusters_in_order() {
    let palette: Palette = ["hsl(0, 80%, 50%)", "hsl(180, 60%, 40%)"]
        .iter()
        .map(|css| css.parse::<Color>().expect("palette entries are valid"))
        .collect();
    let explorer = ExplorerBuilder::new(common::points())
        .with_tree(common::tree())
        .with_palette(palette.clone())
        .build()
        .expect("valid");
    let scene = explorer.scene(ViewMode::Cut { height: 1.0 });
    let colors: Vec<_> = scene.layout.iter().map(|visual| visual.color).collect();
    assert_eq!(colors.len(), 3);
    assert_eq!(colors[0], palette.entries()[0]);
    assert_eq!(colors[1], palette.entries()[1]);
    assert_eq!(colors[2], generated_color(2, 3));
}
