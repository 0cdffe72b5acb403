//! Interactive shape viewer
//!
//! Run with:
//!   cargo run --example viewer -- --shape sphere
//!   cargo run --example viewer -- --shape cylinder --camera free-look
//!
//! Controls:
//!   Drag     - Orbit (orbit camera) or look around (free-look camera)
//!   Scroll   - Zoom
//!   Arrows   - Move (free-look camera)
//!   W / F    - Wireframe / filled polygons
//!   Escape   - Exit

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use glam::Vec3;
use shape_engine::{
    backend::{BackendError, GraphicsBackend},
    drawable::{Cone, Cube, Cylinder, HeightField, Pyramid, Sphere, Tetrahedron, TexturedQuad, Triangle},
    resources::Renderable,
    scene::{FreeLookCamera, Movement, OrbitCamera},
    window, Drawable, Engine, EngineConfig, Entity, EntityAllocator, InputBindings, PolygonMode,
    WgpuBackend, Window,
};
use winit::{event_loop::EventLoop, keyboard::KeyCode};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ShapeArg {
    Triangle,
    Tetrahedron,
    Cube,
    Pyramid,
    Cone,
    Cylinder,
    Sphere,
    HeightField,
    TexturedQuad,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum CameraArg {
    Orbit,
    FreeLook,
}

#[derive(Parser, Debug)]
#[command(about = "Draw one procedural shape")]
struct Args {
    #[arg(long, value_enum, default_value_t = ShapeArg::Cube)]
    shape: ShapeArg,

    #[arg(long, value_enum, default_value_t = CameraArg::Orbit)]
    camera: CameraArg,

    #[arg(long, default_value_t = 800)]
    width: u32,

    #[arg(long, default_value_t = 600)]
    height: u32,

    /// Present without waiting for vertical blank
    #[arg(long)]
    no_vsync: bool,

    #[arg(long, default_value = "shaders")]
    shader_dir: PathBuf,

    /// Start in line polygon mode
    #[arg(long)]
    wireframe: bool,

    /// Image for the textured quad
    #[arg(long, default_value = "assets/checker.png")]
    texture: PathBuf,
}

struct Viewer {
    gfx: WgpuBackend,
    engine: Engine,
    camera: Entity,
    mesh: Renderable,
}

fn build_shape(shape: ShapeArg, texture: PathBuf) -> Result<Drawable, Box<dyn std::error::Error>> {
    let drawable = match shape {
        ShapeArg::Triangle => Triangle::default().into(),
        ShapeArg::Tetrahedron => Tetrahedron::default().into(),
        ShapeArg::Cube => Cube::new(Vec3::ZERO, Vec3::Z, Vec3::X, 2.0)?.into(),
        ShapeArg::Pyramid => Pyramid::default().into(),
        ShapeArg::Cone => Cone::default().into(),
        ShapeArg::Cylinder => Cylinder::default().into(),
        ShapeArg::Sphere => Sphere::new(Vec3::ZERO, 1.5)?.into(),
        ShapeArg::HeightField => HeightField::builder(|x, y| 0.1 * (x * x + y * y).sqrt().sin())
            .half_extents(5.0, 5.0)
            .segments(80, 80)
            .build()?
            .into(),
        ShapeArg::TexturedQuad => TexturedQuad::new(Vec3::ZERO, Vec3::X, Vec3::Y, texture)?.into(),
    };
    Ok(drawable)
}

fn bind_controls(bindings: &mut InputBindings<Viewer>, camera: CameraArg) {
    bindings.register_key(KeyCode::Escape, |_, window: &mut Window, _| window.set_close(true));
    bindings.register_key(KeyCode::KeyW, |viewer: &mut Viewer, _, _| {
        viewer.gfx.set_polygon_mode(PolygonMode::Line)
    });
    bindings.register_key(KeyCode::KeyF, |viewer: &mut Viewer, _, _| {
        viewer.gfx.set_polygon_mode(PolygonMode::Fill)
    });

    bindings.register_framebuffer_resize(|viewer: &mut Viewer, width, height| {
        viewer.engine.resize(&mut viewer.gfx, width, height);
    });

    match camera {
        CameraArg::Orbit => {
            bindings.register_drag(|viewer: &mut Viewer, dx, dy| {
                if let Some(orbit) = viewer
                    .engine
                    .camera_mut(viewer.camera)
                    .and_then(|c| c.as_orbit_mut())
                {
                    orbit.relative_drag(dx, dy);
                }
            });
            bindings.register_scroll(|viewer: &mut Viewer, dy| {
                if let Some(orbit) = viewer
                    .engine
                    .camera_mut(viewer.camera)
                    .and_then(|c| c.as_orbit_mut())
                {
                    orbit.relative_zoom(dy);
                }
            });
        }
        CameraArg::FreeLook => {
            for (key, movement) in [
                (KeyCode::ArrowUp, Movement::Forward),
                (KeyCode::ArrowDown, Movement::Backward),
                (KeyCode::ArrowLeft, Movement::Left),
                (KeyCode::ArrowRight, Movement::Right),
            ] {
                bindings.register_key(key, move |viewer: &mut Viewer, _, dt| {
                    if let Some(free_look) = viewer
                        .engine
                        .camera_mut(viewer.camera)
                        .and_then(|c| c.as_free_look_mut())
                    {
                        free_look.process_keyboard(movement, dt);
                    }
                });
            }
            bindings.register_drag(|viewer: &mut Viewer, dx, dy| {
                if let Some(free_look) = viewer
                    .engine
                    .camera_mut(viewer.camera)
                    .and_then(|c| c.as_free_look_mut())
                {
                    // window y grows downwards
                    free_look.process_mouse(dx, -dy, true);
                }
            });
            bindings.register_scroll(|viewer: &mut Viewer, dy| {
                if let Some(free_look) = viewer
                    .engine
                    .camera_mut(viewer.camera)
                    .and_then(|c| c.as_free_look_mut())
                {
                    free_look.process_scroll(dy);
                }
            });
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    shape_engine::init_logging();
    let args = Args::parse();

    let config = EngineConfig {
        title: format!("Shape Engine - {:?}", args.shape),
        width: args.width,
        height: args.height,
        vsync: !args.no_vsync,
        shader_dir: args.shader_dir.clone(),
        polygon_mode: if args.wireframe {
            PolygonMode::Line
        } else {
            PolygonMode::Fill
        },
        ..EngineConfig::default()
    };

    let event_loop = EventLoop::new()?;
    let window = Window::new(&event_loop, &config.title, config.width, config.height)?;

    let mut gfx = WgpuBackend::new(window.window_arc(), config.vsync)?;
    gfx.set_polygon_mode(config.polygon_mode);
    log::info!("Using {} backend", gfx.name());

    let mut engine = Engine::new(&config);
    let drawable = build_shape(args.shape, args.texture)?;
    let mesh = engine.load_mesh(&mut gfx, &drawable)?;

    let mut entities = EntityAllocator::new();
    let camera = entities.create()?;
    match args.camera {
        CameraArg::Orbit => engine.create_camera(camera, OrbitCamera::default()),
        CameraArg::FreeLook => engine.create_camera(camera, FreeLookCamera::default()),
    };
    let (width, height) = gfx.surface_size();
    engine.resize(&mut gfx, width, height);

    let mut bindings = InputBindings::new();
    bind_controls(&mut bindings, args.camera);

    let viewer = Viewer {
        gfx,
        engine,
        camera,
        mesh,
    };

    window::run(event_loop, window, bindings, viewer, |viewer, window, _dt| {
        match viewer.gfx.begin_frame() {
            Ok(()) => {}
            Err(BackendError::SurfaceLost) => {
                log::debug!("Surface lost, reconfigured");
                return;
            }
            Err(e) => {
                log::error!("Failed to begin frame: {e}");
                window.set_close(true);
                return;
            }
        }

        if let Some(camera) = viewer.engine.camera(viewer.camera) {
            viewer.engine.render(&mut viewer.gfx, viewer.mesh, camera);
        }

        if let Err(e) = viewer.gfx.end_frame() {
            log::error!("Failed to present frame: {e}");
        }

        if window.should_close() {
            viewer.engine.destroy(&mut viewer.gfx);
        }
    })?;

    Ok(())
}
