//! End-to-end pipeline test: OBJ in, frames out, teardown clean.

use std::rc::Rc;

use lumen_engine::prelude::*;
use lumen_engine::render::uniforms::uniform;

/// A textured cube: 8 positions, 4 uvs, 6 normals, quad faces.
const CUBE_OBJ: &str = "\
v -0.5 -0.5 0.5
v 0.5 -0.5 0.5
v 0.5 0.5 0.5
v -0.5 0.5 0.5
v -0.5 -0.5 -0.5
v 0.5 -0.5 -0.5
v 0.5 0.5 -0.5
v -0.5 0.5 -0.5
vt 0.0 0.0
vt 1.0 0.0
vt 1.0 1.0
vt 0.0 1.0
vn 0.0 0.0 1.0
vn 0.0 0.0 -1.0
vn 1.0 0.0 0.0
vn -1.0 0.0 0.0
vn 0.0 1.0 0.0
vn 0.0 -1.0 0.0
f 1/1/1 2/2/1 3/3/1 4/4/1
f 6/1/2 5/2/2 8/3/2 7/4/2
f 2/1/3 6/2/3 7/3/3 3/4/3
f 5/1/4 1/2/4 4/3/4 8/4/4
f 4/1/5 3/2/5 7/3/5 8/4/5
f 5/1/6 6/2/6 2/3/6 1/4/6
";

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn load_cube(cache: &mut ResourceCache) -> Rc<MeshData> {
    cache
        .mesh("meshes/cube.obj", || Ok(mesh_from_obj(CUBE_OBJ)))
        .expect("cube obj parses")
}

#[test]
fn obj_cube_dedups_to_one_vertex_per_face_corner() {
    init_logging();
    let mut cache = ResourceCache::new();
    let mesh = load_cube(&mut cache);

    // Six faces of four unique (position, uv, normal) corners each.
    assert_eq!(mesh.vertex_count(), 24);
    assert_eq!(mesh.indices.len(), 36);
    assert!(mesh.indices.iter().all(|&i| i < 24));
    assert_eq!(mesh.tangents.len(), 24);

    // Second request is served from the cache.
    let again = load_cube(&mut cache);
    assert!(Rc::ptr_eq(&mesh, &again));
}

#[test]
fn scene_runs_frames_and_tears_down_cleanly() {
    init_logging();
    let device = Rc::new(HeadlessDevice::new(800, 600));
    let config = EngineConfig::from_toml(
        "clear_color = [0.0, 0.0, 0.0, 1.0]\ntarget_fps = 50.0\n\n[camera]\nz_offset = 5.0\n",
    )
    .unwrap();

    let mut cache = ResourceCache::new();
    let mesh = load_cube(&mut cache);

    let mut scene = Scene::from_config(&config);
    scene.bind_device(device.clone());
    scene.add_entity(
        Entity::new("crate")
            .with_behaviour(Box::new(MeshRenderBehaviour::new(mesh, Material::default()))),
    );
    scene.add_entity(Entity::light(
        "sky",
        Light::ambient(Vec4::new(0.2, 0.2, 0.25, 1.0)),
    ));
    scene.add_entity(Entity::light(
        "sun",
        Light::directional(Vec4::new(1.0, 1.0, 0.9, 1.0), Vec3::new(-1.0, -1.0, 0.0)),
    ));
    let mut lamp = Entity::light(
        "lamp",
        Light::point(Vec4::new(1.0, 0.6, 0.3, 1.0), Attenuation::default()),
    );
    lamp.state.transform.set_position(0.0, 2.0, 0.0);
    scene.add_entity(lamp);

    // Drive two frames through the pacing clock, holding W on the first.
    let mut clock = FrameClock::new(config.target_fps);
    let mut input = Input::new();
    input.press_key("w");

    let mut frames = 0;
    for now in [0.000, 0.021, 0.030, 0.042] {
        let Some(delta) = clock.tick(now) else {
            continue;
        };
        scene.update(&input, delta);
        scene.draw();
        input.end_frame();
        frames += 1;
        if frames == 1 {
            input.release_key("w");
        }
    }
    assert_eq!(frames, 2);
    assert_eq!(device.draw_count(), 2);

    // The configured clear color was used every frame.
    let clears = device.clears();
    assert_eq!(clears.len(), 2);
    assert_eq!(clears[0].1, [0.0, 0.0, 0.0, 1.0]);

    // The fly behaviour moved the camera forward from its configured offset.
    let camera_z = scene.camera().entity.state.transform.position().z;
    assert!(camera_z < 5.0, "camera did not fly forward: z = {camera_z}");

    // Light aggregation reached the shader.
    let program = device.draws()[0].program;
    assert_eq!(
        device.uniform_value(program, uniform::AMBIENT_COLOR),
        Some(UniformValue::Vec4([0.2, 0.2, 0.25, 1.0]))
    );
    assert_eq!(
        device.uniform_value(program, uniform::DIR_LIGHT_COUNT),
        Some(UniformValue::Int(1))
    );
    assert_eq!(
        device.uniform_value(program, uniform::POINT_LIGHT_COUNT),
        Some(UniformValue::Int(1))
    );
    assert_eq!(
        device.uniform_value(program, uniform::POINT_LIGHT_POSITIONS),
        Some(UniformValue::Vec3Array(vec![[0.0, 2.0, 0.0]]))
    );
    assert_eq!(
        device.uniform_value(program, uniform::SPOT_LIGHT_COUNT),
        Some(UniformValue::Int(0))
    );

    // Teardown releases every device resource, camera included.
    scene.destroy();
    assert_eq!(device.live_buffer_count(), 0);
    assert_eq!(device.live_program_count(), 0);
    assert_eq!(device.live_texture_count(), 0);
}

#[test]
fn attaching_a_behaviour_to_a_live_entity_does_not_leak_resources() {
    struct Spin;
    impl Behaviour for Spin {
        fn update(&mut self, state: &mut EntityState, ctx: &UpdateContext<'_>) {
            state.transform.rotate(0.0, ctx.delta, 0.0);
        }
    }

    init_logging();
    let device = Rc::new(HeadlessDevice::new(320, 240));
    let mut scene = Scene::new();
    scene.bind_device(device.clone());

    let mut cache = ResourceCache::new();
    let mesh = load_cube(&mut cache);
    scene.add_entity(
        Entity::new("crate")
            .with_behaviour(Box::new(MeshRenderBehaviour::new(mesh, Material::default()))),
    );

    let input = Input::new();
    scene.update(&input, 0.016);
    let buffers = device.live_buffer_count();
    let programs = device.live_program_count();
    let textures = device.live_texture_count();

    // The late attach must not re-run the mesh renderer's upload.
    scene
        .find_object_mut("crate")
        .unwrap()
        .add_behaviour(Box::new(Spin));
    scene.update(&input, 0.016);
    assert_eq!(device.live_buffer_count(), buffers);
    assert_eq!(device.live_program_count(), programs);
    assert_eq!(device.live_texture_count(), textures);

    scene.destroy();
    assert_eq!(device.live_buffer_count(), 0);
    assert_eq!(device.live_program_count(), 0);
    assert_eq!(device.live_texture_count(), 0);
}

#[test]
fn entities_can_join_a_running_scene() {
    init_logging();
    let device = Rc::new(HeadlessDevice::new(320, 240));
    let mut scene = Scene::new();
    scene.bind_device(device.clone());

    let input = Input::new();
    scene.update(&input, 0.016);
    scene.draw();
    assert_eq!(device.draw_count(), 0);

    let mut cache = ResourceCache::new();
    let mesh = load_cube(&mut cache);
    scene.add_entity(
        Entity::new("latecomer")
            .with_behaviour(Box::new(MeshRenderBehaviour::new(mesh, Material::default()))),
    );

    scene.draw();
    assert_eq!(device.draw_count(), 1);
    assert!(scene.find_object("latecomer").is_some());

    scene.destroy();
}
