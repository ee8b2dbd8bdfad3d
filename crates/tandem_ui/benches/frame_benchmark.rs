//! Benchmark for full two-pass frames.
//!
//! TARGET: a 1,000 element menu in well under a millisecond per frame
//!
//! Run with: cargo bench --package tandem_ui --bench frame_benchmark

#![allow(missing_docs)]

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use tandem_ui::{
    BackendError, Color, ElementId, EngineConfig, InputState, Layout, PointerKind, RenderBackend, Session,
    TextRequest, TextShaper, TextureHandle, Ui, Vec2, Vec2i, Vec4,
};

/// Backend that accepts and drops everything.
struct NullBackend;

impl RenderBackend for NullBackend {
    fn window_size(&self) -> Vec2i {
        Vec2i::new(1920, 1080)
    }

    fn set_ortho_projection(&mut self, _canvas: Vec2i) {}

    fn draw_rect(&mut self, _: Vec2i, _: Vec2i, _: Color) -> Result<(), BackendError> {
        Ok(())
    }

    fn draw_texture(&mut self, _: &TextureHandle, _: Vec2i, _: Vec2i, _: Color) -> Result<(), BackendError> {
        Ok(())
    }

    fn draw_nine_patch(&mut self, _: &TextureHandle, _: Vec4, _: Vec2i, _: Vec2i) -> Result<(), BackendError> {
        Ok(())
    }

    fn push_clip(&mut self, _: Vec2i, _: Vec2i) {}

    fn pop_clip(&mut self) {}
}

/// Monospace shaper.
struct FixedShaper;

impl TextShaper for FixedShaper {
    fn measure(&mut self, request: &TextRequest) -> Result<Vec2i, BackendError> {
        let glyphs = request.text.chars().count() as i32;
        Ok(Vec2i::new(glyphs * request.pixel_height / 2, request.pixel_height))
    }

    fn draw(&mut self, _: &TextRequest, _: Vec2i, _: Color) -> Result<(), BackendError> {
        Ok(())
    }
}

const ROWS: usize = 250;

fn menu(ui: &mut Ui<'_>, offset: &mut Vec2, names: &[String]) {
    let panel = TextureHandle::new(1, Vec2i::new(64, 64));

    ui.start_group(Layout::VerticalCenter, 4.0, ElementId::DEFAULT_GROUP);
    ui.image_background_nine_patch(&panel, Vec4::new(0.25, 0.25, 0.75, 0.75));
    ui.set_margin(16.0);
    ui.label("Inventory", 40.0);

    ui.start_group(Layout::VerticalLeft, 2.0, "rows");
    ui.start_scroll(Vec2::new(600.0, 700.0), offset);
    for name in names {
        ui.start_group(Layout::HorizontalCenter, 8.0, name.as_str());
        ui.check_event();
        ui.color_background(Color::rgb(0.1, 0.1, 0.1));
        ui.custom_element(Vec2::new(32.0, 32.0), "icon", |canvas, position, size| {
            canvas.fill_rect(position, size, Color::WHITE);
        });
        ui.label(name, 24.0);
        ui.end_group();
    }
    ui.end_scroll();
    ui.end_group();

    ui.end_group();
}

fn bench_frame(c: &mut Criterion) {
    let names: Vec<String> = (0..ROWS).map(|i| format!("item {i:04}")).collect();

    let mut group = c.benchmark_group("frame");
    // Each row is a group, an icon and a label.
    group.throughput(Throughput::Elements((ROWS * 3) as u64));

    group.bench_function("idle", |b| {
        let mut session = Session::new(EngineConfig::default()).unwrap();
        let mut backend = NullBackend;
        let mut shaper = FixedShaper;
        let input = InputState::new();
        let mut offset = Vec2::ZERO;

        b.iter(|| {
            let report = session
                .run(&mut backend, &mut shaper, &input, |ui| menu(ui, &mut offset, &names))
                .unwrap();
            black_box(report.commands)
        });
    });

    group.bench_function("hover_and_wheel", |b| {
        let mut session = Session::new(EngineConfig::default()).unwrap();
        let mut backend = NullBackend;
        let mut shaper = FixedShaper;
        let mut input = InputState::new();
        let mut offset = Vec2::ZERO;
        let mut y = 200;

        b.iter(|| {
            input.begin_frame();
            y = if y > 800 { 200 } else { y + 7 };
            input.set_pointer(0, Vec2i::new(900, y), PointerKind::Mouse);
            input.scroll(0.0, -0.25);
            let report = session
                .run(&mut backend, &mut shaper, &input, |ui| menu(ui, &mut offset, &names))
                .unwrap();
            black_box(report.events.len())
        });
    });

    group.finish();
}

criterion_group!(benches, bench_frame);
criterion_main!(benches);
