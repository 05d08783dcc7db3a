use web_sys::{
    WebGl2RenderingContext, WebGlBuffer, WebGlProgram, WebGlUniformLocation,
    WebGlVertexArrayObject,
};
use crate::config::{OrnamentKind, OrnamentMaterial};
use crate::generation::FOLIAGE_FLOATS_PER_PARTICLE;
use crate::math::{Mat4, Vec3};
use crate::mesh::{Mesh, FLOATS_PER_VERTEX};
use crate::scene::{FrameOutput, TreeScene};
use super::webgl::WebGLContext;
use super::shaders::*;

/// Cached uniform locations for the foliage shader
struct FoliageUniformLocations {
    view: Option<WebGlUniformLocation>,
    projection: Option<WebGlUniformLocation>,
    time: Option<WebGlUniformLocation>,
    progress: Option<WebGlUniformLocation>,
    jitter: Option<WebGlUniformLocation>,
}

/// Cached uniform locations for the ornament shader
struct OrnamentUniformLocations {
    view: Option<WebGlUniformLocation>,
    projection: Option<WebGlUniformLocation>,
    camera_pos: Option<WebGlUniformLocation>,
    color: Option<WebGlUniformLocation>,
    emissive: Option<WebGlUniformLocation>,
    emissive_intensity: Option<WebGlUniformLocation>,
    metalness: Option<WebGlUniformLocation>,
    roughness: Option<WebGlUniformLocation>,
    light_pos: Option<WebGlUniformLocation>,
    light_color: Option<WebGlUniformLocation>,
}

/// GPU state for one instanced ornament group
struct OrnamentDraw {
    kind: OrnamentKind,
    material: OrnamentMaterial,
    vao: WebGlVertexArrayObject,
    instance_buffer: WebGlBuffer,
    index_count: i32,
    instance_count: i32,
}

/// Draws the foliage points and the three ornament groups
pub struct RenderPipeline {
    ctx: WebGLContext,

    foliage_program: WebGlProgram,
    ornament_program: WebGlProgram,
    foliage_uniforms: FoliageUniformLocations,
    ornament_uniforms: OrnamentUniformLocations,

    foliage_vao: Option<WebGlVertexArrayObject>,
    foliage_count: i32,
    jitter_amplitude: f32,

    ornaments: Vec<OrnamentDraw>,
    /// Reused flat buffer for per-frame instance matrices
    instance_scratch: Vec<f32>,

    width: i32,
    height: i32,

    // Camera and key light, owned by the host
    pub camera_position: Vec3,
    pub camera_target: Vec3,
    pub fov: f32,
    pub light_position: Vec3,
    pub light_color: Vec3,
}

impl RenderPipeline {
    pub fn new(gl: WebGl2RenderingContext, width: i32, height: i32) -> Result<Self, String> {
        let ctx = WebGLContext::new(gl);

        let foliage_program = ctx.create_program(FOLIAGE_VERTEX_SHADER, FOLIAGE_FRAGMENT_SHADER)?;
        let ornament_program = ctx.create_program(ORNAMENT_VERTEX_SHADER, ORNAMENT_FRAGMENT_SHADER)?;

        let foliage_uniforms = FoliageUniformLocations {
            view: ctx.get_uniform_location(&foliage_program, "u_view"),
            projection: ctx.get_uniform_location(&foliage_program, "u_projection"),
            time: ctx.get_uniform_location(&foliage_program, "u_time"),
            progress: ctx.get_uniform_location(&foliage_program, "u_progress"),
            jitter: ctx.get_uniform_location(&foliage_program, "u_jitter"),
        };

        let ornament_uniforms = OrnamentUniformLocations {
            view: ctx.get_uniform_location(&ornament_program, "u_view"),
            projection: ctx.get_uniform_location(&ornament_program, "u_projection"),
            camera_pos: ctx.get_uniform_location(&ornament_program, "u_camera_pos"),
            color: ctx.get_uniform_location(&ornament_program, "u_color"),
            emissive: ctx.get_uniform_location(&ornament_program, "u_emissive"),
            emissive_intensity: ctx.get_uniform_location(&ornament_program, "u_emissive_intensity"),
            metalness: ctx.get_uniform_location(&ornament_program, "u_metalness"),
            roughness: ctx.get_uniform_location(&ornament_program, "u_roughness"),
            light_pos: ctx.get_uniform_location(&ornament_program, "u_light_pos"),
            light_color: ctx.get_uniform_location(&ornament_program, "u_light_color"),
        };

        Ok(Self {
            ctx,
            foliage_program,
            ornament_program,
            foliage_uniforms,
            ornament_uniforms,
            foliage_vao: None,
            foliage_count: 0,
            jitter_amplitude: 0.0,
            ornaments: Vec::new(),
            instance_scratch: Vec::new(),
            width,
            height,
            camera_position: Vec3::new(0.0, 0.0, 20.0),
            camera_target: Vec3::ZERO,
            fov: 45f32.to_radians(),
            light_position: Vec3::new(10.0, 10.0, 10.0),
            light_color: Vec3::new(1.0, 0.92, 0.7),
        })
    }

    /// Upload the static foliage buffer and one mesh per ornament group
    pub fn upload_scene(&mut self, scene: &TreeScene) -> Result<(), String> {
        self.upload_foliage(scene)?;

        self.ornaments.clear();
        for batch in scene.batches() {
            let group = scene.config().ornaments.group(batch.kind);
            let mesh = Mesh::for_primitive(group.primitive);
            batch.flatten_into(&mut self.instance_scratch);
            let draw = self.upload_ornament_group(batch.kind, group.material, &mesh)?;
            self.ornaments.push(draw);
        }

        log::debug!(
            "uploaded {} foliage points and {} ornament groups",
            self.foliage_count,
            self.ornaments.len()
        );
        Ok(())
    }

    fn upload_foliage(&mut self, scene: &TreeScene) -> Result<(), String> {
        let gl = &self.ctx.gl;

        let vao = self.ctx.create_vao()?;
        gl.bind_vertex_array(Some(&vao));

        let data = scene.foliage().attribute_data();
        let buffer = self.ctx.create_buffer_f32(&data, WebGl2RenderingContext::STATIC_DRAW)?;

        // Layout: tree_pos(3) + scatter_pos(3) + color(3) + size(1)
        let stride = (FOLIAGE_FLOATS_PER_PARTICLE * 4) as i32;
        gl.bind_buffer(WebGl2RenderingContext::ARRAY_BUFFER, Some(&buffer));
        self.ctx.float_attribute(0, 3, stride, 0);
        self.ctx.float_attribute(1, 3, stride, 12);
        self.ctx.float_attribute(2, 3, stride, 24);
        self.ctx.float_attribute(3, 1, stride, 36);

        gl.bind_vertex_array(None);
        gl.bind_buffer(WebGl2RenderingContext::ARRAY_BUFFER, None);

        self.foliage_vao = Some(vao);
        self.foliage_count = scene.foliage().len() as i32;
        self.jitter_amplitude = scene.config().jitter_amplitude;
        Ok(())
    }

    /// Expects the group's initial matrices in `instance_scratch`
    fn upload_ornament_group(
        &self,
        kind: OrnamentKind,
        material: OrnamentMaterial,
        mesh: &Mesh,
    ) -> Result<OrnamentDraw, String> {
        let gl = &self.ctx.gl;

        let vao = self.ctx.create_vao()?;
        gl.bind_vertex_array(Some(&vao));

        let vertex_buffer = self.ctx.create_buffer_f32(&mesh.vertex_data(), WebGl2RenderingContext::STATIC_DRAW)?;
        let stride = (FLOATS_PER_VERTEX * 4) as i32;
        gl.bind_buffer(WebGl2RenderingContext::ARRAY_BUFFER, Some(&vertex_buffer));
        self.ctx.float_attribute(0, 3, stride, 0);
        self.ctx.float_attribute(1, 3, stride, 12);

        self.ctx.create_index_buffer(mesh.index_data(), WebGl2RenderingContext::STATIC_DRAW)?;

        let instance_buffer = self.ctx.create_buffer_f32(&self.instance_scratch, WebGl2RenderingContext::DYNAMIC_DRAW)?;
        gl.bind_buffer(WebGl2RenderingContext::ARRAY_BUFFER, Some(&instance_buffer));
        self.ctx.instanced_mat4_attribute(2);

        gl.bind_vertex_array(None);
        gl.bind_buffer(WebGl2RenderingContext::ARRAY_BUFFER, None);

        Ok(OrnamentDraw {
            kind,
            material,
            vao,
            instance_buffer,
            index_count: mesh.index_data().len() as i32,
            instance_count: (self.instance_scratch.len() / 16) as i32,
        })
    }

    /// Render a frame
    pub fn render(&mut self, frame: &FrameOutput<'_>) {
        // Instance matrices first; they are the only per-frame uploads
        for draw in &self.ornaments {
            if let Some(batch) = frame.ornaments.iter().find(|b| b.kind == draw.kind) {
                if draw.instance_count > 0 {
                    batch.flatten_into(&mut self.instance_scratch);
                    self.ctx.update_buffer_f32(&draw.instance_buffer, &self.instance_scratch);
                }
            }
        }

        let gl = &self.ctx.gl;

        let aspect = self.width as f32 / self.height.max(1) as f32;
        let projection = Mat4::perspective(self.fov, aspect, 0.1, 200.0);
        let view = Mat4::look_at(self.camera_position, self.camera_target, Vec3::UP);

        self.ctx.viewport(0, 0, self.width, self.height);
        self.ctx.clear(0.008, 0.024, 0.09, 1.0);
        self.ctx.enable_depth_test();
        self.ctx.disable_blending();

        // Ornaments, opaque
        gl.use_program(Some(&self.ornament_program));
        let u = &self.ornament_uniforms;
        self.ctx.uniform_matrix4fv(u.view.as_ref(), view.as_slice());
        self.ctx.uniform_matrix4fv(u.projection.as_ref(), projection.as_slice());
        self.ctx.uniform_vec3(u.camera_pos.as_ref(), self.camera_position);
        self.ctx.uniform_vec3(u.light_pos.as_ref(), self.light_position);
        self.ctx.uniform_vec3(u.light_color.as_ref(), self.light_color);

        for draw in self.ornaments.iter().filter(|d| d.instance_count > 0) {
            let m = &draw.material;
            self.ctx.uniform_vec3(u.color.as_ref(), m.color.to_vec3());
            self.ctx.uniform_vec3(u.emissive.as_ref(), m.emissive.to_vec3());
            self.ctx.uniform_1f(u.emissive_intensity.as_ref(), m.emissive_intensity);
            self.ctx.uniform_1f(u.metalness.as_ref(), m.metalness);
            self.ctx.uniform_1f(u.roughness.as_ref(), m.roughness);

            gl.bind_vertex_array(Some(&draw.vao));
            gl.draw_elements_instanced_with_i32(
                WebGl2RenderingContext::TRIANGLES,
                draw.index_count,
                WebGl2RenderingContext::UNSIGNED_INT,
                0,
                draw.instance_count,
            );
        }

        // Foliage, additive on top
        if let Some(vao) = self.foliage_vao.as_ref() {
            gl.use_program(Some(&self.foliage_program));
            self.ctx.enable_additive_blending();

            let u = &self.foliage_uniforms;
            self.ctx.uniform_matrix4fv(u.view.as_ref(), view.as_slice());
            self.ctx.uniform_matrix4fv(u.projection.as_ref(), projection.as_slice());
            self.ctx.uniform_1f(u.time.as_ref(), frame.uniforms.time);
            self.ctx.uniform_1f(u.progress.as_ref(), frame.uniforms.progress);
            self.ctx.uniform_1f(u.jitter.as_ref(), self.jitter_amplitude);

            gl.bind_vertex_array(Some(vao));
            gl.draw_arrays(WebGl2RenderingContext::POINTS, 0, self.foliage_count);
        }

        gl.bind_vertex_array(None);
    }

    /// Resize the render pipeline
    pub fn resize(&mut self, width: i32, height: i32) {
        self.width = width;
        self.height = height;
    }
}
