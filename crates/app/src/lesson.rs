use crate::config::LessonConfig;
use crate::frame::FrameTime;
use cubestudy_common::{NodeId, Viewport};
use cubestudy_input::orbit::OrbitControls;
use cubestudy_render::PerspectiveCamera;
use cubestudy_scene::{
    BoxGeometry, DirectionalLight, LineBasicMaterial, Node, PhongMaterial, SceneError, SceneGraph,
    WireframeGeometry,
};
use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Which lesson to assemble.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Lesson {
    /// Spinning shaded cube.
    #[default]
    Basic,
    /// Static cube with a wireframe overlay and orbit controls.
    Geometry,
}

impl Lesson {
    pub const ALL: [Lesson; 2] = [Lesson::Basic, Lesson::Geometry];

    pub fn as_str(&self) -> &'static str {
        match self {
            Lesson::Basic => "basic",
            Lesson::Geometry => "geometry",
        }
    }
}

impl std::fmt::Display for Lesson {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Lesson {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "basic" | "1" => Ok(Lesson::Basic),
            "geometry" | "2" => Ok(Lesson::Geometry),
            other => Err(format!("unknown lesson '{other}' (expected basic or geometry)")),
        }
    }
}

/// Per-tick mutation applied after rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateStep {
    /// Set the node's x and y rotation to the elapsed seconds.
    Spin { node: NodeId },
    /// Leave the scene untouched.
    Still,
}

impl UpdateStep {
    pub fn apply(&self, scene: &mut SceneGraph, time: FrameTime) -> Result<(), SceneError> {
        match *self {
            UpdateStep::Spin { node } => {
                let angle = time.seconds() as f32;
                scene.set_rotation(node, Vec3::new(angle, angle, 0.0))
            }
            UpdateStep::Still => Ok(()),
        }
    }
}

/// Output of [`assemble`]: a sealed scene plus everything the frame loop needs.
#[derive(Debug)]
pub struct AssembledScene {
    pub scene: SceneGraph,
    pub camera: PerspectiveCamera,
    /// The lesson's model: the cube (basic) or the cube+outline group (geometry).
    pub tracked: NodeId,
    pub update: UpdateStep,
    pub controls: Option<OrbitControls>,
}

/// Build the scene for `lesson`. The camera takes its aspect from `viewport`,
/// or 1 while the container has no area yet.
pub fn assemble(
    lesson: Lesson,
    config: &LessonConfig,
    viewport: Viewport,
) -> Result<AssembledScene, SceneError> {
    let cam = &config.camera;
    let aspect = viewport.aspect().unwrap_or(1.0);
    let mut camera = PerspectiveCamera::new(cam.fov_degrees, aspect, cam.near, cam.far);
    camera.position = Vec3::from_array(cam.position);
    camera.look_at(Vec3::ZERO);
    camera.update_projection_matrix();

    let mut scene = SceneGraph::new();

    let light = &config.light;
    scene.add(
        Node::directional_light(DirectionalLight::new(light.color, light.intensity))
            .with_name("light")
            .with_position(Vec3::from_array(light.position)),
    )?;

    let model = &config.model;
    let [width, height, depth] = model.size;
    let (tracked, update) = match lesson {
        Lesson::Basic => {
            let geometry = Arc::new(BoxGeometry::new(width, height, depth).build());
            let cube = scene.add(
                Node::mesh(geometry, PhongMaterial::new(model.cube_color)).with_name("cube"),
            )?;
            (cube, UpdateStep::Spin { node: cube })
        }
        Lesson::Geometry => {
            let [sx, sy, sz] = model.segments;
            let geometry = Arc::new(BoxGeometry::with_segments(width, height, depth, sx, sy, sz).build());
            let outline = Arc::new(WireframeGeometry::from_geometry(&geometry));

            let group = scene.add(Node::group().with_name("model"))?;
            scene.add_child(
                group,
                Node::mesh(Arc::clone(&geometry), PhongMaterial::new(model.fill_color))
                    .with_name("fill"),
            )?;
            scene.add_child(
                group,
                Node::line_segments(
                    outline,
                    LineBasicMaterial {
                        color: model.line_color,
                    },
                )
                .with_name("outline"),
            )?;
            (group, UpdateStep::Still)
        }
    };

    let controls = match lesson {
        Lesson::Geometry => Some(OrbitControls::new(&mut camera)),
        Lesson::Basic => None,
    };

    scene.seal();
    tracing::info!(
        %lesson,
        nodes = scene.node_count(),
        aspect,
        "scene assembled"
    );

    Ok(AssembledScene {
        scene,
        camera,
        tracked,
        update,
        controls,
    })
}
