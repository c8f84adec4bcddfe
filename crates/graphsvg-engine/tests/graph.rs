use std::cell::{Cell, RefCell};
use std::rc::Rc;

use graphsvg_engine::coords::{DeviceSize, Extent, Vec2};
use graphsvg_engine::draw::{Func, Handle, Param, Props};
use graphsvg_engine::error::{DrawError, GraphError, ShaderError};
use graphsvg_engine::input::PointerEvent;
use graphsvg_engine::scene::Tag;
use graphsvg_engine::shader::{RasterBackend, ShaderProgram, ShaderUniforms};
use graphsvg_engine::time::FrameTime;
use graphsvg_engine::{CommandDecl, Graph, GraphConfig, GraphDecl};

/// Widest surface [`RecordingProgram`] accepts on resize.
const MAX_WIDTH: u32 = 4096;

/// Records every call a surface receives.
#[derive(Default)]
struct Journal {
    created: usize,
    renders: Vec<ShaderUniforms>,
    resizes: Vec<DeviceSize>,
}

struct RecordingProgram(Rc<RefCell<Journal>>);

impl ShaderProgram for RecordingProgram {
    fn resize(&mut self, size: DeviceSize) -> Result<(), ShaderError> {
        if size.width > MAX_WIDTH {
            return Err(ShaderError::Device { message: format!("{} exceeds {MAX_WIDTH}", size.width) });
        }
        self.0.borrow_mut().resizes.push(size);
        Ok(())
    }

    fn render(&mut self, uniforms: &ShaderUniforms) {
        self.0.borrow_mut().renders.push(*uniforms);
    }
}

struct RecordingBackend(Rc<RefCell<Journal>>);

impl RasterBackend for RecordingBackend {
    fn create_program(&mut self, source: &str, _size: DeviceSize) -> Result<Box<dyn ShaderProgram>, ShaderError> {
        if source.contains("broken") {
            return Err(ShaderError::Compile { message: "broken".into() });
        }
        self.0.borrow_mut().created += 1;
        Ok(Box::new(RecordingProgram(self.0.clone())))
    }
}

fn recording_graph(config: GraphConfig) -> (Graph, Rc<RefCell<Journal>>) {
    let journal = Rc::new(RefCell::new(Journal::default()));
    let graph = Graph::new(config).with_backend(Box::new(RecordingBackend(journal.clone())));
    (graph, journal)
}

fn lines_with_opacity(graph: &Graph, layer: &str, opacity: &str) -> usize {
    let container = graph.layer(layer).unwrap().container();
    graph
        .scene()
        .descendants(container)
        .into_iter()
        .filter(|&id| graph.scene().tag(id) == Some(Tag::Line))
        .filter(|&id| graph.scene().attr(id, "stroke-opacity") == Some(opacity))
        .count()
}

#[test]
fn default_grid_has_nine_lines_per_axis() {
    let mut graph = Graph::default();
    graph.add("grid", "grid", vec![Param::Number(1.0)], Props::new()).unwrap();

    let container = graph.layer("grid").unwrap().container();
    let group = graph.scene().children(container)[0];
    let lines = graph.scene().children(group);
    let scene = graph.scene();
    let vertical = lines.iter().filter(|&&id| scene.attr(id, "x1") == scene.attr(id, "x2")).count();
    let horizontal = lines.iter().filter(|&&id| scene.attr(id, "y1") == scene.attr(id, "y2")).count();

    assert_eq!(lines.len(), 18);
    assert_eq!(vertical, 9);
    assert_eq!(horizontal, 9);
    assert_eq!(lines_with_opacity(&graph, "grid", "1"), 2);
    assert_eq!(lines_with_opacity(&graph, "grid", "0.1"), 16);
}

#[test]
fn unknown_primitive_leaves_output_unchanged() {
    let mut graph = Graph::default();
    graph.add("main", "lineX", vec![Param::Number(0.0)], Props::new()).unwrap();
    let before = graph.to_svg();

    let handle = graph.add("main", "nonexistent", vec![], Props::new()).unwrap();
    assert_eq!(handle, None);
    assert_eq!(graph.to_svg(), before);
    assert_eq!(graph.layer("main").unwrap().len(), 1);

    graph.draw_layer("main").unwrap();
    graph.draw();
    assert_eq!(graph.to_svg(), before);
}

#[test]
fn drag_pans_by_device_delta() {
    let mut graph = Graph::new(GraphConfig {
        view: Extent::new(0.0, 0.0, 10.0, 10.0),
        size: DeviceSize::new(100, 100),
    });

    graph.handle_pointer(PointerEvent::pressed(50.0, 50.0));
    let r = graph.handle_pointer(PointerEvent::moved(60.0, 50.0));
    assert!(r.panned);
    assert!((graph.view().x - -1.0).abs() < 1e-12);

    graph.handle_pointer(PointerEvent::moved(60.0, 60.0));
    assert!((graph.view().y - 1.0).abs() < 1e-12);

    graph.handle_pointer(PointerEvent::released(60.0, 60.0));
    graph.handle_pointer(PointerEvent::moved(90.0, 90.0));
    assert_eq!(graph.view(), Extent::new(-1.0, 1.0, 10.0, 10.0));
}

#[test]
fn pan_redraws_layers_against_new_view() {
    let mut graph = Graph::new(GraphConfig {
        view: Extent::new(0.0, 0.0, 10.0, 10.0),
        size: DeviceSize::new(100, 100),
    });
    graph.add("main", "lineX", vec![Param::Number(5.0)], Props::new()).unwrap();

    graph.handle_pointer(PointerEvent::pressed(0.0, 0.0));
    graph.handle_pointer(PointerEvent::moved(10.0, 0.0));

    // View is now -1..9, so x = 5 sits at 60% of the width.
    let container = graph.layer("main").unwrap().container();
    let line = graph.scene().children(container)[0];
    assert_eq!(graph.scene().attr(line, "x1"), Some("60"));
}

#[test]
fn visibility_against_viewport() {
    let mut graph = Graph::new(GraphConfig { size: DeviceSize::new(100, 100), ..GraphConfig::default() });
    graph.set_placement(0.0, 0.0);

    assert!(graph.is_visible(Extent::new(50.0, 50.0, 200.0, 200.0)));
    assert!(!graph.is_visible(Extent::new(300.0, 300.0, 100.0, 100.0)));
    // Touching edges only: zero-area overlap.
    assert!(!graph.is_visible(Extent::new(100.0, 0.0, 100.0, 100.0)));

    graph.set_placement(0.0, 500.0);
    assert!(!graph.is_visible(Extent::new(0.0, 0.0, 800.0, 400.0)));
    assert!(graph.is_visible(Extent::new(0.0, 0.0, 800.0, 501.0)));
}

#[test]
fn draw_twice_is_identical() {
    let mut graph = Graph::default();
    graph.add("grid", "grid", vec![], Props::new()).unwrap();
    graph
        .add("main", "func", vec![Param::Function(Func::new(f64::sin))], Props::new().with("stroke", "red"))
        .unwrap();
    graph
        .add("main", "point", vec![Param::Number(1.0), Param::Number(2.0)], Props::new().with("label", "A"))
        .unwrap();

    graph.draw();
    let first = graph.to_svg();
    graph.draw();
    assert_eq!(first, graph.to_svg());
}

#[test]
fn init_routes_commands_to_their_layers() {
    let mut graph = Graph::default();
    let decl = GraphDecl {
        view: None,
        size: Some(DeviceSize::new(200, 200)),
        commands: vec![
            CommandDecl::new("grid", "grid", vec![Param::Number(1.0)], Props::new()),
            CommandDecl::new("main", "lineY", vec![Param::Number(0.0)], Props::new()),
            CommandDecl::new("main", "nonexistent", vec![], Props::new()),
        ],
    };
    graph.init(decl).unwrap();

    assert_eq!(graph.layers().names().collect::<Vec<_>>(), vec!["grid", "main"]);
    assert_eq!(graph.layer("main").unwrap().len(), 1);
    assert_eq!(graph.scene().attr(graph.root(), "width"), Some("200"));
}

#[test]
fn shader_surface_is_created_once_and_animated() {
    let (mut graph, journal) = recording_graph(GraphConfig::default());
    let handle = graph
        .add("background", "shader", vec![Param::from("fn fs_main() {}")], Props::new())
        .unwrap();
    assert!(matches!(handle, Some(Handle::Surface(_))));

    graph.draw();
    graph.set_size(300, 200);
    graph.draw();
    assert_eq!(journal.borrow().created, 1);
    assert_eq!(graph.rasters().len(), 1);
    assert_eq!(journal.borrow().resizes, vec![DeviceSize::new(300, 200)]);

    graph.tick(&FrameTime::fixed(60, 1.0 / 60.0));
    let journal = journal.borrow();
    let last = journal.renders.last().unwrap();
    assert!((last.time - 1.0).abs() < 1e-5);
    assert_eq!(last.viewport, [-4.0, -4.0, 4.0, 4.0]);
}

#[test]
fn oversized_resize_keeps_the_surface() {
    let (mut graph, journal) = recording_graph(GraphConfig::default());
    let id = graph
        .add("background", "shader", vec![Param::from("fn fs_main() {}")], Props::new())
        .unwrap()
        .and_then(Handle::surface)
        .unwrap();

    graph.set_size(MAX_WIDTH + 1, 100);
    assert_eq!(graph.size(), DeviceSize::new(MAX_WIDTH + 1, 100));
    assert_eq!(graph.rasters().get(id).unwrap().size(), DeviceSize::new(400, 400));
    assert!(journal.borrow().resizes.is_empty());

    // Still alive and rendering.
    let renders = journal.borrow().renders.len();
    graph.tick(&FrameTime::fixed(1, 1.0 / 60.0));
    assert_eq!(journal.borrow().renders.len(), renders + 1);

    graph.set_size(800, 100);
    assert_eq!(graph.rasters().get(id).unwrap().size(), DeviceSize::new(800, 100));
}

#[test]
fn reset_layer_frees_its_surfaces() {
    let (mut graph, journal) = recording_graph(GraphConfig::default());
    let bg = graph
        .add("background", "shader", vec![Param::from("fn fs_main() {}")], Props::new())
        .unwrap()
        .and_then(Handle::surface)
        .unwrap();
    let fg = graph
        .add("overlay", "shader", vec![Param::from("fn fs_main() {}")], Props::new())
        .unwrap()
        .and_then(Handle::surface)
        .unwrap();
    graph.add("background", "lineX", vec![Param::Number(0.0)], Props::new()).unwrap();

    graph.reset_layer("background");
    graph.draw();
    assert!(!graph.rasters().contains(bg));
    assert!(graph.rasters().contains(fg));
    assert_eq!(graph.rasters().len(), 1);
    assert!(graph.layer("background").unwrap().is_empty());

    let before = journal.borrow().renders.len();
    graph.tick(&FrameTime::fixed(1, 1.0 / 60.0));
    assert_eq!(journal.borrow().renders.len(), before + 1);

    // A new shader on the reset layer gets a fresh surface.
    let again = graph
        .add("background", "shader", vec![Param::from("fn fs_main() {}")], Props::new())
        .unwrap()
        .and_then(Handle::surface)
        .unwrap();
    assert_ne!(again, bg);
    assert_eq!(journal.borrow().created, 3);
    assert_eq!(graph.rasters().len(), 2);
}

#[test]
fn failing_layer_does_not_stop_the_others() {
    let mut graph = Graph::default();
    let calls = Rc::new(Cell::new(0));
    let counter = calls.clone();
    graph.primitives_mut().register("flaky", move |_target, _frame, _params, _props| {
        counter.set(counter.get() + 1);
        if counter.get() > 1 {
            return Err(DrawError::Shader(ShaderError::Device { message: "device lost".into() }));
        }
        Ok(None)
    });
    graph.add("a", "flaky", vec![], Props::new()).unwrap();
    graph.add("a", "lineY", vec![Param::Number(0.0)], Props::new()).unwrap();
    graph.add("b", "lineX", vec![Param::Number(1.0)], Props::new()).unwrap();

    graph.set_view(Extent::new(-1.0, -1.0, 10.0, 10.0));
    assert_eq!(calls.get(), 2);

    // Layer a stopped at the failing command; layer b still followed the view.
    let a = graph.layer("a").unwrap().container();
    assert!(graph.scene().children(a).is_empty());
    let b = graph.layer("b").unwrap().container();
    let line = graph.scene().children(b)[0];
    assert_eq!(graph.scene().attr(line, "x1"), Some("80"));

    let err = graph.draw_layer("a").unwrap_err();
    let GraphError::Shader { layer, key, .. } = err;
    assert_eq!((layer.as_str(), key.as_str()), ("a", "flaky"));
}

#[test]
fn shader_failure_is_fatal_and_reported() {
    let (mut graph, _journal) = recording_graph(GraphConfig::default());
    let err = graph
        .add("background", "shader", vec![Param::from("broken")], Props::new())
        .unwrap_err();
    let GraphError::Shader { layer, key, source } = err;
    assert_eq!(layer, "background");
    assert_eq!(key, "shader");
    assert!(matches!(source, ShaderError::Compile { .. }));
    assert!(graph.rasters().is_empty());
}

#[test]
fn shader_without_backend_stops_init() {
    let mut graph = Graph::default();
    let decl = GraphDecl {
        commands: vec![
            CommandDecl::new("main", "shader", vec![Param::from("src")], Props::new()),
            CommandDecl::new("main", "lineX", vec![Param::Number(0.0)], Props::new()),
        ],
        ..GraphDecl::default()
    };
    let err = graph.init(decl).unwrap_err();
    assert!(matches!(err, GraphError::Shader { source: ShaderError::NoBackend, .. }));
    assert!(graph.layer("main").unwrap().is_empty());
}

#[test]
fn registry_is_extensible() {
    let mut graph = Graph::default();
    graph.primitives_mut().register("origin", |target, frame, _params, _props| {
        let dot = target.scene.create(Tag::Circle);
        target.scene.set_attr(dot, "cx", frame.device_x(0.0));
        target.scene.set_attr(dot, "cy", frame.device_y(0.0));
        target.scene.append(frame.container, dot);
        Ok(Some(Handle::Node(dot)))
    });
    graph.add("main", "origin", vec![], Props::new()).unwrap();
    assert!(graph.to_svg().contains("<circle cx=\"200\" cy=\"200\"/>"));
}

#[test]
fn mouse_is_reported_in_logical_units() {
    let mut graph = Graph::default();
    graph.handle_pointer(PointerEvent::moved(200.0, 100.0));
    assert_eq!(graph.mouse(), Some(Vec2::new(0.0, 2.0)));
}
