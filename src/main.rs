use fault_terrain::{DrawMode, RenderCapabilities, TerrainMesh, TerrainSettings};

use bevy::prelude::*;
use bevy_fly_camera::{FlyCamera, FlyCameraPlugin};

/// Local z of the terrain is height; stretch it so the relief is visible.
const TERRAIN_SCALE: Vec3 = Vec3::new(10., 10., 30.);

#[derive(Component)]
struct TerrainView(DrawMode);

fn main() {
    App::new()
        .add_plugins(DefaultPlugins)
        .add_plugin(FlyCameraPlugin)
        .add_startup_system(setup_terrain)
        .add_system(toggle_draw_mode)
        .run();
}

fn setup_terrain(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let settings = TerrainSettings::default().with_seed(2);

    let terrain = match TerrainMesh::generate(&settings) {
        Ok(terrain) => terrain,
        Err(err) => {
            error!("Terrain generation failed: {err}");
            return;
        }
    };

    let heights = terrain.height_map();
    info!(
        "Terrain heights: min {:.3}, max {:.3}, mean {:.4}",
        heights.min(),
        heights.max(),
        heights.mean()
    );
    terrain.log_buffers();

    let caps = RenderCapabilities::default();
    let (filled, edges) = match (
        terrain.to_render_mesh(caps, DrawMode::Triangles),
        terrain.to_render_mesh(caps, DrawMode::Edges),
    ) {
        (Ok(filled), Ok(edges)) => (filled, edges),
        (Err(err), _) | (_, Err(err)) => {
            error!("Terrain upload failed: {err}");
            return;
        }
    };

    // Terrain is z-up, bevy is y-up
    let transform = Transform::from_rotation(Quat::from_rotation_x(-0.5 * std::f32::consts::PI))
        .with_scale(TERRAIN_SCALE);

    commands.spawn((
        PbrBundle {
            mesh: meshes.add(filled),
            material: materials.add(StandardMaterial {
                base_color: Color::rgb(1., 0.85, 0.57),
                perceptual_roughness: 0.5,
                ..default()
            }),
            transform,
            ..default()
        },
        TerrainView(DrawMode::Triangles),
    ));

    commands.spawn((
        PbrBundle {
            mesh: meshes.add(edges),
            material: materials.add(StandardMaterial {
                base_color: Color::rgb(0.1, 0.1, 0.1),
                unlit: true,
                ..default()
            }),
            transform,
            visibility: Visibility::Hidden,
            ..default()
        },
        TerrainView(DrawMode::Edges),
    ));

    add_camera(&mut commands);
    add_lights(&mut commands);
}

fn toggle_draw_mode(
    keys: Res<Input<KeyCode>>,
    mut views: Query<(&TerrainView, &mut Visibility)>,
) {
    if !keys.just_pressed(KeyCode::Tab) {
        return;
    }

    for (view, mut visibility) in &mut views {
        *visibility = match *visibility {
            Visibility::Hidden => Visibility::Inherited,
            _ => Visibility::Hidden,
        };
        debug!("Terrain {:?} view now {:?}", view.0, *visibility);
    }
}

fn add_camera(commands: &mut Commands) {
    commands
        .spawn(Camera3dBundle {
            transform: Transform::from_translation(Vec3 {
                x: 0.0,
                y: 4.0,
                z: 18.0,
            }),
            ..default()
        })
        .insert(FlyCamera::default());
}

/// Relief is only a few hundredths high, so light it from a low angle.
const SUN_ELEVATION_DEG: f32 = 20.;

fn sun_transform() -> Transform {
    let elevation = SUN_ELEVATION_DEG.to_radians();
    let toward_sun = Vec3::new(elevation.cos(), elevation.sin(), 0.3).normalize();
    Transform::from_translation(toward_sun).looking_at(Vec3::ZERO, Vec3::Y)
}

fn add_lights(commands: &mut Commands) {
    // Cool sky fill so the shadowed slopes keep some shape
    commands.insert_resource(AmbientLight {
        color: Color::rgb(0.55, 0.65, 0.9),
        brightness: 0.15,
    });

    commands.spawn(DirectionalLightBundle {
        directional_light: DirectionalLight {
            color: Color::rgb(1., 0.95, 0.85),
            illuminance: 12000.,
            ..default()
        },
        transform: sun_transform(),
        ..default()
    });
}
