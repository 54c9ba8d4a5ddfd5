use web_sys::{
    WebGl2RenderingContext, WebGlBuffer, WebGlProgram, WebGlUniformLocation,
    WebGlVertexArrayObject,
};
use crate::fields::{GeometryKind, Transform};
use crate::math::{Mat4, Vec3};
use crate::mesh::mesh_for_kind;
use crate::scene::{Light, PointMaterial, Scene};
use super::webgl::WebGLContext;
use super::shaders::*;

/// Cached uniform locations for the point shader
struct PointUniforms {
    model: Option<WebGlUniformLocation>,
    view: Option<WebGlUniformLocation>,
    projection: Option<WebGlUniformLocation>,
    size: Option<WebGlUniformLocation>,
    pixel_scale: Option<WebGlUniformLocation>,
    color: Option<WebGlUniformLocation>,
    opacity: Option<WebGlUniformLocation>,
}

/// Cached uniform locations for the wireframe shader
struct WireUniforms {
    model: Option<WebGlUniformLocation>,
    view: Option<WebGlUniformLocation>,
    projection: Option<WebGlUniformLocation>,
    color: Option<WebGlUniformLocation>,
    emissive: Option<WebGlUniformLocation>,
    opacity: Option<WebGlUniformLocation>,
    ambient: Option<WebGlUniformLocation>,
    dir_direction: Option<WebGlUniformLocation>,
    dir_color: Option<WebGlUniformLocation>,
    point_position: Option<WebGlUniformLocation>,
    point_color: Option<WebGlUniformLocation>,
    point_range: Option<WebGlUniformLocation>,
}

/// A GPU-resident point cloud
struct PointBatch {
    vao: WebGlVertexArrayObject,
    buffer: WebGlBuffer,
    count: i32,
}

/// A GPU-resident wireframe mesh
struct LineBatch {
    kind: GeometryKind,
    vao: WebGlVertexArrayObject,
    vertex_buffer: WebGlBuffer,
    index_buffer: WebGlBuffer,
    index_count: i32,
}

/// Lights flattened into the shader's fixed-size uniform arrays
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LightBlock {
    pub ambient: [f32; 3],
    pub dir_direction: [f32; 3 * MAX_DIRECTIONAL_LIGHTS],
    pub dir_color: [f32; 3 * MAX_DIRECTIONAL_LIGHTS],
    pub point_position: [f32; 3 * MAX_POINT_LIGHTS],
    pub point_color: [f32; 3 * MAX_POINT_LIGHTS],
    pub point_range: [f32; MAX_POINT_LIGHTS],
}

impl LightBlock {
    /// Pack lights, premultiplying color by intensity. Extra lights are ignored.
    pub fn pack(lights: &[Light]) -> Self {
        let mut block = LightBlock {
            point_range: [1.0; MAX_POINT_LIGHTS],
            ..Default::default()
        };
        let mut dir = 0;
        let mut point = 0;

        for light in lights {
            match *light {
                Light::Ambient { color, intensity } => {
                    let c = color.scale(intensity);
                    for (slot, v) in block.ambient.iter_mut().zip(c.to_array()) {
                        *slot += v;
                    }
                }
                Light::Directional { position, color, intensity } if dir < MAX_DIRECTIONAL_LIGHTS => {
                    // Directional lights shine from `position` toward the origin
                    write3(&mut block.dir_direction, dir, position.normalize());
                    write3(&mut block.dir_color, dir, color.scale(intensity));
                    dir += 1;
                }
                Light::Point { position, color, intensity, range } if point < MAX_POINT_LIGHTS => {
                    write3(&mut block.point_position, point, position);
                    write3(&mut block.point_color, point, color.scale(intensity));
                    block.point_range[point] = range.max(f32::EPSILON);
                    point += 1;
                }
                _ => {}
            }
        }

        block
    }
}

fn write3(target: &mut [f32], slot: usize, v: Vec3) {
    target[slot * 3..slot * 3 + 3].copy_from_slice(&v.to_array());
}

/// Renders the composed scene into a transparent canvas
pub struct RenderPipeline {
    ctx: WebGLContext,

    point_program: WebGlProgram,
    wire_program: WebGlProgram,
    point_uniforms: PointUniforms,
    wire_uniforms: WireUniforms,

    cloud: PointBatch,
    spiral: PointBatch,
    shapes: Vec<LineBatch>,
    lights: LightBlock,

    // Drawing buffer size in device pixels
    width: i32,
    height: i32,
}

impl RenderPipeline {
    pub fn new(gl: WebGl2RenderingContext, width: i32, height: i32, scene: &Scene) -> Result<Self, String> {
        let ctx = WebGLContext::new(gl);

        let point_program = ctx.create_program(POINT_VERTEX_SHADER, POINT_FRAGMENT_SHADER)?;
        let wire_program = ctx.create_program(WIRE_VERTEX_SHADER, WIRE_FRAGMENT_SHADER)?;

        let point_uniforms = PointUniforms {
            model: ctx.get_uniform_location(&point_program, "u_model"),
            view: ctx.get_uniform_location(&point_program, "u_view"),
            projection: ctx.get_uniform_location(&point_program, "u_projection"),
            size: ctx.get_uniform_location(&point_program, "u_size"),
            pixel_scale: ctx.get_uniform_location(&point_program, "u_pixel_scale"),
            color: ctx.get_uniform_location(&point_program, "u_color"),
            opacity: ctx.get_uniform_location(&point_program, "u_opacity"),
        };

        let wire_uniforms = WireUniforms {
            model: ctx.get_uniform_location(&wire_program, "u_model"),
            view: ctx.get_uniform_location(&wire_program, "u_view"),
            projection: ctx.get_uniform_location(&wire_program, "u_projection"),
            color: ctx.get_uniform_location(&wire_program, "u_color"),
            emissive: ctx.get_uniform_location(&wire_program, "u_emissive"),
            opacity: ctx.get_uniform_location(&wire_program, "u_opacity"),
            ambient: ctx.get_uniform_location(&wire_program, "u_ambient"),
            dir_direction: ctx.get_uniform_location(&wire_program, "u_dir_light_direction"),
            dir_color: ctx.get_uniform_location(&wire_program, "u_dir_light_color"),
            point_position: ctx.get_uniform_location(&wire_program, "u_point_light_position"),
            point_color: ctx.get_uniform_location(&wire_program, "u_point_light_color"),
            point_range: ctx.get_uniform_location(&wire_program, "u_point_light_range"),
        };

        let cloud = Self::upload_points(&ctx, scene.sphere_cloud.position_data(), WebGl2RenderingContext::DYNAMIC_DRAW)?;
        let spiral = Self::upload_points(&ctx, scene.spiral.position_data(), WebGl2RenderingContext::STATIC_DRAW)?;

        let mut shapes = Vec::with_capacity(GeometryKind::ALL.len());
        for kind in GeometryKind::ALL {
            shapes.push(Self::upload_wireframe(&ctx, kind)?);
        }

        ctx.gl.enable(WebGl2RenderingContext::DEPTH_TEST);

        Ok(Self {
            ctx,
            point_program,
            wire_program,
            point_uniforms,
            wire_uniforms,
            cloud,
            spiral,
            shapes,
            lights: LightBlock::pack(&scene.lights),
            width,
            height,
        })
    }

    /// Upload xyz point data. Layout: position(3) = 3 floats per point
    fn upload_points(ctx: &WebGLContext, data: &[f32], usage: u32) -> Result<PointBatch, String> {
        let gl = &ctx.gl;

        let vao = ctx.create_vao()?;
        gl.bind_vertex_array(Some(&vao));

        let buffer = ctx.create_buffer_f32(data, usage)?;
        gl.bind_buffer(WebGl2RenderingContext::ARRAY_BUFFER, Some(&buffer));

        gl.enable_vertex_attrib_array(0);
        gl.vertex_attrib_pointer_with_i32(0, 3, WebGl2RenderingContext::FLOAT, false, 3 * 4, 0);

        gl.bind_vertex_array(None);
        gl.bind_buffer(WebGl2RenderingContext::ARRAY_BUFFER, None);

        Ok(PointBatch {
            vao,
            buffer,
            count: (data.len() / 3) as i32,
        })
    }

    fn upload_wireframe(ctx: &WebGLContext, kind: GeometryKind) -> Result<LineBatch, String> {
        let gl = &ctx.gl;
        let mesh = mesh_for_kind(kind);
        let lines = mesh.wireframe_indices();

        let vao = ctx.create_vao()?;
        gl.bind_vertex_array(Some(&vao));

        let vertex_buffer = ctx.create_buffer_f32(&mesh.vertex_data(), WebGl2RenderingContext::STATIC_DRAW)?;
        let index_buffer = ctx.create_index_buffer(&lines, WebGl2RenderingContext::STATIC_DRAW)?;

        // Layout: position(3) + normal(3) = 6 floats
        let stride = 6 * 4;
        gl.bind_buffer(WebGl2RenderingContext::ARRAY_BUFFER, Some(&vertex_buffer));
        gl.bind_buffer(WebGl2RenderingContext::ELEMENT_ARRAY_BUFFER, Some(&index_buffer));

        gl.enable_vertex_attrib_array(0);
        gl.vertex_attrib_pointer_with_i32(0, 3, WebGl2RenderingContext::FLOAT, false, stride, 0);

        gl.enable_vertex_attrib_array(1);
        gl.vertex_attrib_pointer_with_i32(1, 3, WebGl2RenderingContext::FLOAT, false, stride, 12);

        gl.bind_vertex_array(None);

        Ok(LineBatch {
            kind,
            vao,
            vertex_buffer,
            index_buffer,
            index_count: lines.len() as i32,
        })
    }

    /// Draw one frame of an already-ticked scene
    pub fn render(&self, scene: &Scene) -> Result<(), String> {
        let gl = &self.ctx.gl;

        if gl.is_context_lost() {
            return Err("WebGL context lost".to_string());
        }

        // Only the sphere cloud changes per vertex
        self.ctx.update_buffer_f32(&self.cloud.buffer, scene.sphere_cloud.position_data());

        let aspect = if self.height > 0 { self.width as f32 / self.height as f32 } else { 0.0 };
        let projection = scene.camera.projection_matrix(aspect);
        let view = scene.camera.view_matrix();

        gl.bind_framebuffer(WebGl2RenderingContext::FRAMEBUFFER, None);
        self.ctx.viewport(0, 0, self.width, self.height);
        self.ctx.clear(0.0, 0.0, 0.0, 0.0);

        // Points: additive, no depth writes
        gl.use_program(Some(&self.point_program));
        gl.depth_mask(false);
        self.ctx.enable_additive_blending();
        self.ctx.uniform_matrix4fv(self.point_uniforms.view.as_ref(), view.as_slice());
        self.ctx.uniform_matrix4fv(self.point_uniforms.projection.as_ref(), projection.as_slice());
        self.ctx.uniform_1f(self.point_uniforms.pixel_scale.as_ref(), self.height as f32 / 2.0);

        self.draw_points(&self.spiral, scene.spiral.transform(), &scene.spiral_material);
        self.draw_points(&self.cloud, scene.sphere_cloud.transform(), &scene.cloud_material);

        // Wireframes: alpha blended, still translucent
        gl.depth_mask(true);
        self.ctx.enable_blending();
        gl.use_program(Some(&self.wire_program));
        self.ctx.uniform_matrix4fv(self.wire_uniforms.view.as_ref(), view.as_slice());
        self.ctx.uniform_matrix4fv(self.wire_uniforms.projection.as_ref(), projection.as_slice());

        let material = &scene.shape_material;
        self.ctx.uniform_3f(self.wire_uniforms.color.as_ref(), material.color.to_array());
        self.ctx.uniform_3f(
            self.wire_uniforms.emissive.as_ref(),
            material.emissive.scale(material.emissive_intensity).to_array(),
        );
        self.ctx.uniform_1f(self.wire_uniforms.opacity.as_ref(), material.opacity);

        let lights = &self.lights;
        self.ctx.uniform_3f(self.wire_uniforms.ambient.as_ref(), lights.ambient);
        self.ctx.uniform_3fv(self.wire_uniforms.dir_direction.as_ref(), &lights.dir_direction);
        self.ctx.uniform_3fv(self.wire_uniforms.dir_color.as_ref(), &lights.dir_color);
        self.ctx.uniform_3fv(self.wire_uniforms.point_position.as_ref(), &lights.point_position);
        self.ctx.uniform_3fv(self.wire_uniforms.point_color.as_ref(), &lights.point_color);
        self.ctx.uniform_1fv(self.wire_uniforms.point_range.as_ref(), &lights.point_range);

        let group = scene.swarm.transform().matrix();
        for shape in scene.swarm.shapes() {
            let Some(batch) = self.shapes.iter().find(|b| b.kind == shape.kind) else {
                continue;
            };

            let model = group.mul(&Mat4::compose(shape.position, shape.rotation, Vec3::splat(shape.scale)));
            self.ctx.uniform_matrix4fv(self.wire_uniforms.model.as_ref(), model.as_slice());

            gl.bind_vertex_array(Some(&batch.vao));
            gl.draw_elements_with_i32(
                WebGl2RenderingContext::LINES,
                batch.index_count,
                WebGl2RenderingContext::UNSIGNED_INT,
                0,
            );
        }

        gl.bind_vertex_array(None);
        Ok(())
    }

    fn draw_points(&self, batch: &PointBatch, transform: &Transform, material: &PointMaterial) {
        let gl = &self.ctx.gl;

        self.ctx.uniform_matrix4fv(self.point_uniforms.model.as_ref(), transform.matrix().as_slice());
        self.ctx.uniform_1f(self.point_uniforms.size.as_ref(), material.size);
        self.ctx.uniform_3f(self.point_uniforms.color.as_ref(), material.color.to_array());
        self.ctx.uniform_1f(self.point_uniforms.opacity.as_ref(), material.opacity);

        gl.bind_vertex_array(Some(&batch.vao));
        gl.draw_arrays(WebGl2RenderingContext::POINTS, 0, batch.count);
    }

    /// Resize the drawing buffer viewport
    pub fn resize(&mut self, width: i32, height: i32) {
        self.width = width.max(0);
        self.height = height.max(0);
    }

    /// Release every GPU object owned by the pipeline
    pub fn dispose(&mut self) {
        let gl = &self.ctx.gl;

        for batch in [&self.cloud, &self.spiral] {
            gl.delete_buffer(Some(&batch.buffer));
            gl.delete_vertex_array(Some(&batch.vao));
        }
        for batch in self.shapes.drain(..) {
            gl.delete_buffer(Some(&batch.vertex_buffer));
            gl.delete_buffer(Some(&batch.index_buffer));
            gl.delete_vertex_array(Some(&batch.vao));
        }

        gl.delete_program(Some(&self.point_program));
        gl.delete_program(Some(&self.wire_program));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::default_lights;

    #[test]
    fn test_pack_default_lights() {
        let block = LightBlock::pack(&default_lights());

        assert!((block.ambient[0] - 0.4).abs() < 1e-6);

        // First directional light points along (1, 1, 1)
        let inv_sqrt3 = 1.0 / 3f32.sqrt();
        for v in &block.dir_direction[0..3] {
            assert!((v - inv_sqrt3).abs() < 1e-6);
        }
        for v in &block.dir_direction[3..6] {
            assert!((v + inv_sqrt3).abs() < 1e-6);
        }

        assert_eq!(block.point_range, [8.0, 6.0, 6.0]);
        assert_eq!(&block.point_position[3..6], &[3.0, 3.0, 3.0]);
    }

    #[test]
    fn test_pack_premultiplies_intensity() {
        let lights = [Light::Point {
            position: Vec3::ZERO,
            color: Vec3::ONE,
            intensity: 1.5,
            range: 8.0,
        }];
        let block = LightBlock::pack(&lights);
        assert_eq!(&block.point_color[0..3], &[1.5, 1.5, 1.5]);
        // Unused slots keep a safe range for the falloff division
        assert_eq!(block.point_range[1], 1.0);
    }

    #[test]
    fn test_pack_ignores_overflow() {
        let light = Light::Directional {
            position: Vec3::UP,
            color: Vec3::ONE,
            intensity: 1.0,
        };
        let block = LightBlock::pack(&[light, light, light]);
        assert_eq!(block.dir_color, [1.0; 6]);
    }
}
