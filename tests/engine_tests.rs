//! Engine integration tests against the recording backend.
//!
//! These tests load real drawables, then inspect the uploaded buffers and the
//! command stream a render call produces.
//!
//! ```bash
//! cargo test --test engine_tests
//! ```

mod common;

use glam::{Mat4, Vec3};
use rstest::rstest;

use common::{draw_ranges, engine, Flavour};
use shape_engine::backend::{GraphicsBackend, PolygonMode, RecordedCommand, Topology};
use shape_engine::drawable::{
    Cone, Cube, Cylinder, Drawable, Geometry, HeightField, Pyramid, Sphere, Tetrahedron,
    TexturedQuad, Triangle,
};
use shape_engine::scene::{Camera, FreeLookCamera, OrbitCamera, ViewProjection};
use shape_engine::EntityAllocator;

fn all_shapes() -> Vec<Drawable> {
    vec![
        Triangle::default().into(),
        Tetrahedron::default().into(),
        Cube::default().into(),
        Pyramid::default().into(),
        Cone::default().into(),
        Cylinder::default().into(),
        Sphere::default().into(),
        HeightField::builder(|x, y| x * y)
            .segments(8, 6)
            .build()
            .unwrap()
            .into(),
    ]
}

// ============================================================================
// Upload Tests
// ============================================================================

#[rstest]
#[case::with_fans(Flavour::WithFans)]
#[case::without_fans(Flavour::WithoutFans)]
fn test_uploaded_vertices_match_drawable(#[case] flavour: Flavour) {
    let mut gfx = flavour.backend();
    let mut engine = engine();

    for drawable in all_shapes() {
        let handle = engine.load_mesh(&mut gfx, &drawable).unwrap();
        let mesh = engine.mesh(handle).unwrap();

        let uploaded = gfx.buffer_floats(mesh.vertex_buffer).unwrap();
        assert_eq!(uploaded, drawable.vertices(), "{}", drawable.name());

        let program = gfx.program(mesh.program).unwrap();
        assert_eq!(program.layout.array_stride, drawable.layout().stride());
    }
}

#[rstest]
#[case::cube(Cube::default().into())]
#[case::cylinder(Cylinder::default().with_segments(6).unwrap().into())]
#[case::sphere(Sphere::default().with_resolution(5, 4).unwrap().into())]
#[case::height_field(HeightField::builder(|_, _| 0.0).segments(3, 2).build().unwrap().into())]
fn test_elements_slice_packed_indices_in_order(#[case] drawable: Drawable) {
    let mut gfx = Flavour::WithFans.backend();
    let mut engine = engine();
    let handle = engine.load_mesh(&mut gfx, &drawable).unwrap();
    let mesh = engine.mesh(handle).unwrap();
    let indices = gfx.buffer_indices(mesh.index_buffer).unwrap();
    let primitives = drawable.primitives();

    assert_eq!(mesh.elements.len(), primitives.len());
    let mut offset = 0;
    for (element, primitive) in mesh.elements.iter().zip(&primitives) {
        assert_eq!(element.offset, offset);
        assert_eq!(element.topology, primitive.topology);
        let range = element.offset as usize..(element.offset + element.count) as usize;
        assert_eq!(&indices[range], primitive.indices.as_slice());
        offset += element.count;
    }
    assert_eq!(offset as usize, indices.len());
}

#[test]
fn test_fans_lowered_to_lists_keep_triangles() {
    let sphere: Drawable = Sphere::default().with_resolution(6, 3).unwrap().into();

    let mut native = Flavour::WithFans.backend();
    let mut lowered = Flavour::WithoutFans.backend();
    let mut engine = engine();
    let native_mesh = engine.load_mesh(&mut native, &sphere).unwrap();
    let lowered_mesh = engine.load_mesh(&mut lowered, &sphere).unwrap();

    let native_mesh = engine.mesh(native_mesh).unwrap();
    let lowered_mesh = engine.mesh(lowered_mesh).unwrap();
    assert_eq!(native_mesh.triangle_count(), lowered_mesh.triangle_count());
    assert!(lowered_mesh
        .elements
        .iter()
        .all(|e| e.topology != Topology::TriangleFan));

    // a fan of 6 rim vertices closed back on the first is 6 triangles
    let top_fan = lowered_mesh.elements[1];
    assert_eq!(top_fan.topology, Topology::TriangleList);
    assert_eq!(top_fan.count, 18);
}

#[test]
fn test_programs_shared_per_shader_and_layout() {
    let mut gfx = Flavour::WithFans.backend();
    let mut engine = engine();
    for drawable in all_shapes() {
        engine.load_mesh(&mut gfx, &drawable).unwrap();
    }
    assert_eq!(engine.program_count(), 1);
    assert_eq!(gfx.live_programs(), 1);

    let quad = TexturedQuad::new(Vec3::ZERO, Vec3::X, Vec3::Y, "no/such/image.png").unwrap();
    engine.load_mesh(&mut gfx, &quad.into()).unwrap();
    assert_eq!(engine.program_count(), 2);
}

// ============================================================================
// Render Tests
// ============================================================================

#[test]
fn test_render_command_order() {
    let mut gfx = Flavour::WithFans.backend();
    let mut engine = engine();
    let handle = engine.load_mesh(&mut gfx, &Cube::default().into()).unwrap();
    let camera = OrbitCamera::default();

    engine.render(&mut gfx, handle, &camera);

    let mesh = engine.mesh(handle).unwrap();
    let commands = gfx.commands();
    assert_eq!(
        commands[0],
        RecordedCommand::BeginPass {
            clear_color: engine.clear_color()
        }
    );
    assert_eq!(commands[1], RecordedCommand::BindProgram(mesh.program));
    assert_eq!(commands[2], RecordedCommand::BindVertexArray(mesh.vertex_array));
    let RecordedCommand::SetUniforms { program, uniforms } = &commands[3] else {
        panic!("expected uniforms, got {:?}", commands[3]);
    };
    assert_eq!(*program, mesh.program);
    assert_eq!(uniforms.model, Mat4::IDENTITY);
    assert_eq!(uniforms.view, camera.view_matrix());
    assert_eq!(uniforms.projection, camera.projection_matrix());
    assert_eq!(commands.last(), Some(&RecordedCommand::EndPass));

    // cube side strip then two caps
    assert_eq!(draw_ranges(&gfx), vec![(10, 0), (4, 10), (4, 14)]);
}

#[test]
fn test_draw_byte_offsets_follow_index_width() {
    let mut gfx = Flavour::WithFans.backend();
    let mut engine = engine();
    let handle = engine.load_mesh(&mut gfx, &Pyramid::default().into()).unwrap();
    engine.render(&mut gfx, handle, &FreeLookCamera::default());

    let offsets: Vec<u64> = gfx
        .draw_calls()
        .filter_map(|command| match command {
            RecordedCommand::DrawIndexed { byte_offset, .. } => Some(*byte_offset),
            _ => None,
        })
        .collect();
    assert_eq!(offsets, vec![0, 6 * 4]);
}

#[test]
fn test_polygon_mode_applies_to_following_draws() {
    let mut gfx = Flavour::WithFans.backend();
    let mut engine = engine();
    let handle = engine.load_mesh(&mut gfx, &Triangle::default().into()).unwrap();
    let camera = OrbitCamera::default();

    engine.render(&mut gfx, handle, &camera);
    gfx.set_polygon_mode(PolygonMode::Line);
    engine.render(&mut gfx, handle, &camera);

    let modes: Vec<PolygonMode> = gfx
        .draw_calls()
        .filter_map(|command| match command {
            RecordedCommand::DrawIndexed { polygon_mode, .. } => Some(*polygon_mode),
            _ => None,
        })
        .collect();
    assert_eq!(modes, vec![PolygonMode::Fill, PolygonMode::Line]);
}

#[test]
fn test_textured_quad_binds_unit_zero_before_draw() {
    let mut gfx = Flavour::WithFans.backend();
    let mut engine = engine();
    let quad = TexturedQuad::new(Vec3::ZERO, Vec3::X, Vec3::Y, "no/such/image.png").unwrap();
    let handle = engine.load_mesh(&mut gfx, &quad.into()).unwrap();
    engine.render(&mut gfx, handle, &OrbitCamera::default());

    let mesh = engine.mesh(handle).unwrap();
    assert_eq!(mesh.textures.len(), 1);
    // unreadable image falls back to a white texel
    assert_eq!(gfx.texture_size(mesh.textures[0]), Some((1, 1)));
    assert!(gfx.program(mesh.program).unwrap().textured);

    let position = gfx
        .commands()
        .iter()
        .position(|c| {
            *c == RecordedCommand::BindTexture {
                unit: 0,
                texture: mesh.textures[0],
            }
        })
        .unwrap();
    assert!(matches!(
        gfx.commands()[position + 1],
        RecordedCommand::DrawIndexed {
            topology: Topology::TriangleStrip,
            count: 4,
            ..
        }
    ));
}

#[test]
fn test_render_counts_frames_only_on_end_frame() {
    let mut gfx = Flavour::WithFans.backend();
    let mut engine = engine();
    let handle = engine.load_mesh(&mut gfx, &Triangle::default().into()).unwrap();

    gfx.begin_frame().unwrap();
    engine.render(&mut gfx, handle, &OrbitCamera::default());
    gfx.end_frame().unwrap();
    assert_eq!(gfx.frames(), 1);
}

// ============================================================================
// Camera and Lifetime Tests
// ============================================================================

#[test]
fn test_resize_updates_registered_cameras() {
    let mut gfx = Flavour::WithFans.backend();
    let mut engine = engine();
    let mut entities = EntityAllocator::new();
    let orbit = entities.create().unwrap();
    let free_look = entities.create().unwrap();

    assert!(engine.create_camera(orbit, OrbitCamera::default()).is_none());
    assert!(engine
        .create_camera(free_look, FreeLookCamera::default())
        .is_none());

    engine.resize(&mut gfx, 1000, 500);
    assert_eq!(gfx.surface_size(), (1000, 500));

    let mut expected_orbit = OrbitCamera::default();
    expected_orbit.set_aspect(2.0);
    assert_eq!(engine.camera(orbit), Some(&Camera::Orbit(expected_orbit)));

    let mut expected_free_look = FreeLookCamera::default();
    expected_free_look.set_aspect(2.0);
    assert_eq!(
        engine.camera(free_look),
        Some(&Camera::FreeLook(expected_free_look))
    );

    // zero sized surfaces leave everything as is
    engine.resize(&mut gfx, 0, 300);
    assert_eq!(gfx.surface_size(), (1000, 500));
}

#[test]
fn test_camera_replaced_and_destroyed() {
    let mut engine = engine();
    let mut entities = EntityAllocator::new();
    let entity = entities.create().unwrap();

    engine.create_camera(entity, OrbitCamera::default());
    let previous = engine.create_camera(entity, FreeLookCamera::default());
    assert!(matches!(previous, Some(Camera::Orbit(_))));

    let camera = engine.camera_mut(entity).unwrap();
    assert!(camera.as_orbit_mut().is_none());
    camera
        .as_free_look_mut()
        .unwrap()
        .process_scroll(10.0);

    assert!(engine.destroy_camera(entity).is_some());
    assert!(engine.camera(entity).is_none());
}

#[test]
fn test_destroy_releases_every_gpu_object() {
    let mut gfx = Flavour::WithoutFans.backend();
    let mut engine = engine();
    for drawable in all_shapes() {
        engine.load_mesh(&mut gfx, &drawable).unwrap();
    }
    let quad = TexturedQuad::new(Vec3::ZERO, Vec3::X, Vec3::Y, "no/such/image.png").unwrap();
    engine.load_mesh(&mut gfx, &quad.into()).unwrap();
    assert!(gfx.live_buffers() > 0);

    engine.destroy(&mut gfx);

    assert_eq!(engine.mesh_count(), 0);
    assert_eq!(engine.program_count(), 0);
    assert_eq!(gfx.live_buffers(), 0);
    assert_eq!(gfx.live_textures(), 0);
    assert_eq!(gfx.live_programs(), 0);
    assert_eq!(gfx.live_vertex_arrays(), 0);
}
