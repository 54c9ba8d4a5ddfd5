/// Number of directional lights the wireframe shader accepts
pub const MAX_DIRECTIONAL_LIGHTS: usize = 2;
/// Number of point lights the wireframe shader accepts
pub const MAX_POINT_LIGHTS: usize = 3;

/// Vertex shader for the particle clouds
pub const POINT_VERTEX_SHADER: &str = r#"#version 300 es
precision highp float;

layout(location = 0) in vec3 a_position;

uniform mat4 u_model;
uniform mat4 u_view;
uniform mat4 u_projection;
uniform float u_size;
uniform float u_pixel_scale;

void main() {
    vec4 view_pos = u_view * u_model * vec4(a_position, 1.0);
    gl_Position = u_projection * view_pos;

    // World-space size, attenuated with depth
    gl_PointSize = max(u_size * (u_pixel_scale / -view_pos.z), 1.0);
}
"#;

/// Fragment shader for the particle clouds
pub const POINT_FRAGMENT_SHADER: &str = r#"#version 300 es
precision highp float;

uniform vec3 u_color;
uniform float u_opacity;

out vec4 fragColor;

void main() {
    vec2 coord = gl_PointCoord - vec2(0.5);
    float dist = length(coord);

    if (dist > 0.5) {
        discard;
    }

    float alpha = u_opacity * smoothstep(0.5, 0.35, dist);
    fragColor = vec4(u_color, alpha);
}
"#;

/// Vertex shader for the wireframe shapes
pub const WIRE_VERTEX_SHADER: &str = r#"#version 300 es
precision highp float;

layout(location = 0) in vec3 a_position;
layout(location = 1) in vec3 a_normal;

uniform mat4 u_model;
uniform mat4 u_view;
uniform mat4 u_projection;

out vec3 v_world_position;
out vec3 v_normal;

void main() {
    vec4 world_pos = u_model * vec4(a_position, 1.0);
    v_world_position = world_pos.xyz;
    v_normal = mat3(u_model) * a_normal;
    gl_Position = u_projection * u_view * world_pos;
}
"#;

/// Fragment shader for the wireframe shapes: Lambert lighting plus emissive
pub const WIRE_FRAGMENT_SHADER: &str = r#"#version 300 es
precision highp float;

in vec3 v_world_position;
in vec3 v_normal;

uniform vec3 u_color;
uniform vec3 u_emissive;
uniform float u_opacity;

uniform vec3 u_ambient;
uniform vec3 u_dir_light_direction[2];
uniform vec3 u_dir_light_color[2];
uniform vec3 u_point_light_position[3];
uniform vec3 u_point_light_color[3];
uniform float u_point_light_range[3];

out vec4 fragColor;

void main() {
    vec3 normal = normalize(v_normal);
    vec3 light = u_ambient;

    for (int i = 0; i < 2; i++) {
        float ndotl = max(dot(normal, normalize(u_dir_light_direction[i])), 0.0);
        light += u_dir_light_color[i] * ndotl;
    }

    for (int i = 0; i < 3; i++) {
        vec3 to_light = u_point_light_position[i] - v_world_position;
        float dist = length(to_light);
        float ndotl = max(dot(normal, to_light / max(dist, 0.0001)), 0.0);
        float falloff = clamp(1.0 - dist / u_point_light_range[i], 0.0, 1.0);
        light += u_point_light_color[i] * ndotl * falloff * falloff;
    }

    vec3 color = u_color * light + u_emissive;
    fragColor = vec4(color, u_opacity);
}
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shader_version() {
        for source in [
            POINT_VERTEX_SHADER,
            POINT_FRAGMENT_SHADER,
            WIRE_VERTEX_SHADER,
            WIRE_FRAGMENT_SHADER,
        ] {
            assert!(source.starts_with("#version 300 es"));
        }
    }

    #[test]
    fn test_light_array_sizes_match() {
        let dir = format!("u_dir_light_color[{}]", MAX_DIRECTIONAL_LIGHTS);
        let point = format!("u_point_light_color[{}]", MAX_POINT_LIGHTS);
        assert!(WIRE_FRAGMENT_SHADER.contains(&dir));
        assert!(WIRE_FRAGMENT_SHADER.contains(&point));
    }
}
