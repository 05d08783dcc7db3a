/// Vertex shader for the foliage point cloud.
/// Keep the morph/jitter/alpha math in step with `animation::foliage_vertex`.
pub const FOLIAGE_VERTEX_SHADER: &str = r#"#version 300 es
precision highp float;

layout(location = 0) in vec3 a_tree_pos;
layout(location = 1) in vec3 a_scatter_pos;
layout(location = 2) in vec3 a_color;
layout(location = 3) in float a_size;

uniform mat4 u_view;
uniform mat4 u_projection;
uniform float u_time;
uniform float u_progress;
uniform float u_jitter;

out vec3 v_color;
out float v_alpha;

void main() {
    v_color = a_color;

    // Morph between the two stored layouts
    vec3 pos = a_scatter_pos * (1.0 - u_progress) + a_tree_pos * u_progress;

    // Breathing
    float jitter = sin(u_time * 2.0 + pos.y * 0.5) * u_jitter;
    pos.x += jitter;
    pos.z += jitter;

    vec4 view_pos = u_view * vec4(pos, 1.0);
    gl_Position = u_projection * view_pos;
    gl_PointSize = a_size * (300.0 / -view_pos.z);
    v_alpha = 0.8 + 0.2 * sin(u_time + pos.y);
}
"#;

/// Fragment shader for foliage: soft round points
pub const FOLIAGE_FRAGMENT_SHADER: &str = r#"#version 300 es
precision highp float;

in vec3 v_color;
in float v_alpha;

out vec4 fragColor;

void main() {
    float dist = distance(gl_PointCoord, vec2(0.5));
    if (dist > 0.5) {
        discard;
    }
    float strength = 1.0 - dist * 2.0;
    fragColor = vec4(v_color, strength * v_alpha);
}
"#;

/// Vertex shader for instanced ornaments. The model matrix arrives as a
/// per-instance attribute occupying locations 2..5.
pub const ORNAMENT_VERTEX_SHADER: &str = r#"#version 300 es
precision highp float;

layout(location = 0) in vec3 a_position;
layout(location = 1) in vec3 a_normal;
layout(location = 2) in mat4 a_model;

uniform mat4 u_view;
uniform mat4 u_projection;

out vec3 v_world_position;
out vec3 v_normal;

void main() {
    vec4 world_pos = a_model * vec4(a_position, 1.0);
    v_world_position = world_pos.xyz;
    // Uniform scale only, so the upper 3x3 is fine for normals
    v_normal = mat3(a_model) * a_normal;
    gl_Position = u_projection * u_view * world_pos;
}
"#;

/// Fragment shader for ornaments: ambient + key light + emissive,
/// with a cheap metalness/roughness specular
pub const ORNAMENT_FRAGMENT_SHADER: &str = r#"#version 300 es
precision highp float;

in vec3 v_world_position;
in vec3 v_normal;

uniform vec3 u_camera_pos;
uniform vec3 u_color;
uniform vec3 u_emissive;
uniform float u_emissive_intensity;
uniform float u_metalness;
uniform float u_roughness;
uniform vec3 u_light_pos;
uniform vec3 u_light_color;

out vec4 fragColor;

void main() {
    vec3 normal = normalize(v_normal);
    vec3 view_dir = normalize(u_camera_pos - v_world_position);
    vec3 light_dir = normalize(u_light_pos - v_world_position);

    float ndotl = max(dot(normal, light_dir), 0.0);

    vec3 ambient = u_color * 0.2;
    vec3 diffuse = u_color * ndotl * (1.0 - u_metalness * 0.7);

    float shininess = mix(128.0, 4.0, u_roughness);
    vec3 half_dir = normalize(light_dir + view_dir);
    float spec = pow(max(dot(normal, half_dir), 0.0), shininess);
    vec3 spec_tint = mix(vec3(0.04), u_color, u_metalness);
    vec3 specular = spec_tint * spec * u_light_color * (1.0 - u_roughness * 0.5);

    vec3 emissive = u_emissive * u_emissive_intensity;

    vec3 final_color = ambient + diffuse * u_light_color + specular + emissive;

    // Tone mapping
    final_color = final_color / (final_color + vec3(1.0));

    // Gamma correction
    final_color = pow(final_color, vec3(1.0 / 2.2));

    fragColor = vec4(final_color, 1.0);
}
"#;
