// SPDX-License-Identifier: MIT OR Apache-2.0
//! Shader node kinds.

use crate::node::{NodeCategory, NodeKind, NodeRegistry};
use crate::resource::ResourceKind;
use crate::setting::SettingDef;
use crate::socket::{Socket, SocketType, SocketValue};

/// Math operations, in menu order
pub const MATH_OPERATIONS: &[&str] = &[
    "ADD", "SUBTRACT", "MULTIPLY", "DIVIDE", "MULTIPLY_ADD", "POWER", "LOGARITHM", "SQRT",
    "INVERSE_SQRT", "ABSOLUTE", "EXPONENT", "MINIMUM", "MAXIMUM", "LESS_THAN", "GREATER_THAN",
    "SIGN", "COMPARE", "SMOOTH_MIN", "SMOOTH_MAX", "ROUND", "FLOOR", "CEIL", "TRUNC", "FRACT",
    "MODULO", "FLOORED_MODULO", "WRAP", "SNAP", "PINGPONG", "SINE", "COSINE", "TANGENT",
    "ARCSINE", "ARCCOSINE", "ARCTANGENT", "ARCTAN2", "SINH", "COSH", "TANH", "RADIANS", "DEGREES",
];

/// Math operations that read a second operand
const MATH_BINARY: &[&str] = &[
    "ADD", "SUBTRACT", "MULTIPLY", "DIVIDE", "MULTIPLY_ADD", "POWER", "LOGARITHM", "MINIMUM",
    "MAXIMUM", "LESS_THAN", "GREATER_THAN", "COMPARE", "SMOOTH_MIN", "SMOOTH_MAX", "MODULO",
    "FLOORED_MODULO", "WRAP", "SNAP", "PINGPONG", "ARCTAN2",
];

/// Math operations that read a third operand
const MATH_TERNARY: &[&str] = &["MULTIPLY_ADD", "COMPARE", "SMOOTH_MIN", "SMOOTH_MAX", "WRAP"];

/// Vector math operations, in menu order
pub const VECTOR_MATH_OPERATIONS: &[&str] = &[
    "ADD", "SUBTRACT", "MULTIPLY", "DIVIDE", "MULTIPLY_ADD", "CROSS_PRODUCT", "PROJECT",
    "REFLECT", "REFRACT", "FACEFORWARD", "DOT_PRODUCT", "DISTANCE", "LENGTH", "SCALE",
    "NORMALIZE", "ABSOLUTE", "MINIMUM", "MAXIMUM", "FLOOR", "CEIL", "FRACTION", "MODULO", "WRAP",
    "SNAP", "SINE", "COSINE", "TANGENT",
];

const VECTOR_MATH_BINARY: &[&str] = &[
    "ADD", "SUBTRACT", "MULTIPLY", "DIVIDE", "MULTIPLY_ADD", "CROSS_PRODUCT", "PROJECT",
    "REFLECT", "REFRACT", "FACEFORWARD", "DOT_PRODUCT", "DISTANCE", "MINIMUM", "MAXIMUM",
    "MODULO", "WRAP", "SNAP",
];

const VECTOR_MATH_TERNARY: &[&str] = &["MULTIPLY_ADD", "FACEFORWARD", "WRAP"];

const VECTOR_MATH_SCALAR_OUT: &[&str] = &["DOT_PRODUCT", "DISTANCE", "LENGTH"];

/// Blend modes shared by the mix nodes
pub const BLEND_TYPES: &[&str] = &[
    "MIX", "DARKEN", "MULTIPLY", "BURN", "LIGHTEN", "SCREEN", "DODGE", "ADD", "OVERLAY",
    "SOFT_LIGHT", "LINEAR_LIGHT", "DIFFERENCE", "EXCLUSION", "SUBTRACT", "DIVIDE", "HUE",
    "SATURATION", "COLOR", "VALUE",
];

fn float_in(name: &str, identifier: &str, value: f32) -> Socket {
    Socket::input(name, SocketType::Float)
        .with_identifier(identifier)
        .with_default(SocketValue::Float(value))
}

fn vector_in(name: &str, identifier: &str, value: [f32; 3]) -> Socket {
    Socket::input(name, SocketType::Vector)
        .with_identifier(identifier)
        .with_default(SocketValue::Vector(value))
}

fn color_in(name: &str, identifier: &str, value: [f32; 4]) -> Socket {
    Socket::input(name, SocketType::Color)
        .with_identifier(identifier)
        .with_default(SocketValue::Color(value))
}

/// Register all shader node kinds
pub fn register(registry: &mut NodeRegistry) {
    let vector_out_ops: Vec<&str> = VECTOR_MATH_OPERATIONS
        .iter()
        .copied()
        .filter(|op| !VECTOR_MATH_SCALAR_OUT.contains(op))
        .collect();

    registry.register(
        NodeKind::new("ShaderNodeMath", "Math", NodeCategory::Converter)
            .setting(SettingDef::enumeration("operation", MATH_OPERATIONS, "ADD"))
            .setting(SettingDef::boolean("use_clamp", false))
            .input(float_in("Value", "Value", 0.5))
            .input(float_in("Value", "Value_001", 0.5))
            .input(float_in("Value", "Value_002", 0.5))
            .output(Socket::output("Value", SocketType::Float))
            .input_when("Value_001", "operation", MATH_BINARY)
            .input_when("Value_002", "operation", MATH_TERNARY),
    );

    registry.register(
        NodeKind::new("ShaderNodeVectorMath", "Vector Math", NodeCategory::Converter)
            .setting(SettingDef::enumeration("operation", VECTOR_MATH_OPERATIONS, "ADD"))
            .input(vector_in("Vector", "Vector", [0.0; 3]))
            .input(vector_in("Vector", "Vector_001", [0.0; 3]))
            .input(vector_in("Vector", "Vector_002", [0.0; 3]))
            .input(float_in("Scale", "Scale", 1.0))
            .output(Socket::output("Vector", SocketType::Vector))
            .output(Socket::output("Value", SocketType::Float))
            .input_when("Vector_001", "operation", VECTOR_MATH_BINARY)
            .input_when("Vector_002", "operation", VECTOR_MATH_TERNARY)
            .input_when("Scale", "operation", &["SCALE", "REFRACT"])
            .output_when("Value", "operation", VECTOR_MATH_SCALAR_OUT)
            .output_when("Vector", "operation", &vector_out_ops),
    );

    registry.register(
        NodeKind::new("ShaderNodeMix", "Mix", NodeCategory::Converter)
            .setting(SettingDef::enumeration("data_type", &["FLOAT", "VECTOR", "RGBA"], "FLOAT"))
            .setting(SettingDef::enumeration("blend_type", BLEND_TYPES, "MIX"))
            .setting(SettingDef::enumeration("factor_mode", &["UNIFORM", "NON_UNIFORM"], "UNIFORM"))
            .setting(SettingDef::boolean("clamp_factor", true))
            .setting(SettingDef::boolean("clamp_result", false))
            .input(float_in("Factor", "Factor_Float", 0.5))
            .input(vector_in("Factor", "Factor_Vector", [0.5; 3]))
            .input(float_in("A", "A_Float", 0.0))
            .input(float_in("B", "B_Float", 0.0))
            .input(vector_in("A", "A_Vector", [0.0; 3]))
            .input(vector_in("B", "B_Vector", [0.0; 3]))
            .input(color_in("A", "A_Color", [0.5, 0.5, 0.5, 1.0]))
            .input(color_in("B", "B_Color", [0.5, 0.5, 0.5, 1.0]))
            .output(Socket::output("Result", SocketType::Float).with_identifier("Result_Float"))
            .output(Socket::output("Result", SocketType::Vector).with_identifier("Result_Vector"))
            .output(Socket::output("Result", SocketType::Color).with_identifier("Result_Color"))
            .input_when("Factor_Float", "data_type", &["FLOAT", "RGBA"])
            .input_when("Factor_Vector", "data_type", &["VECTOR"])
            .input_when("A_Float", "data_type", &["FLOAT"])
            .input_when("B_Float", "data_type", &["FLOAT"])
            .input_when("A_Vector", "data_type", &["VECTOR"])
            .input_when("B_Vector", "data_type", &["VECTOR"])
            .input_when("A_Color", "data_type", &["RGBA"])
            .input_when("B_Color", "data_type", &["RGBA"])
            .output_when("Result_Float", "data_type", &["FLOAT"])
            .output_when("Result_Vector", "data_type", &["VECTOR"])
            .output_when("Result_Color", "data_type", &["RGBA"]),
    );

    registry.register(
        NodeKind::new("ShaderNodeMixRGB", "Mix (Legacy)", NodeCategory::Color)
            .setting(SettingDef::enumeration("blend_type", BLEND_TYPES, "MIX"))
            .setting(SettingDef::boolean("use_alpha", false))
            .setting(SettingDef::boolean("use_clamp", false))
            .input(float_in("Fac", "Fac", 0.5))
            .input(color_in("Color1", "Color1", [0.5, 0.5, 0.5, 1.0]))
            .input(color_in("Color2", "Color2", [0.5, 0.5, 0.5, 1.0]))
            .output(Socket::output("Color", SocketType::Color)),
    );

    registry.register(
        NodeKind::new("ShaderNodeTexNoise", "Noise Texture", NodeCategory::Texture)
            .setting(SettingDef::enumeration("noise_dimensions", &["1D", "2D", "3D", "4D"], "3D"))
            .setting(SettingDef::boolean("normalize", true))
            .input(vector_in("Vector", "Vector", [0.0; 3]))
            .input(float_in("W", "W", 0.0))
            .input(float_in("Scale", "Scale", 5.0))
            .input(float_in("Detail", "Detail", 2.0))
            .input(float_in("Roughness", "Roughness", 0.5))
            .input(float_in("Lacunarity", "Lacunarity", 2.0))
            .input(float_in("Distortion", "Distortion", 0.0))
            .output(Socket::output("Fac", SocketType::Float))
            .output(Socket::output("Color", SocketType::Color))
            .input_when("Vector", "noise_dimensions", &["2D", "3D", "4D"])
            .input_when("W", "noise_dimensions", &["1D", "4D"])
            .width(145.0),
    );

    registry.register(
        NodeKind::new("ShaderNodeTexImage", "Image Texture", NodeCategory::Texture)
            .setting(SettingDef::resource("image", ResourceKind::Image))
            .setting(SettingDef::enumeration("interpolation", &["Linear", "Closest", "Cubic", "Smart"], "Linear"))
            .setting(SettingDef::enumeration("projection", &["FLAT", "BOX", "SPHERE", "TUBE"], "FLAT"))
            .setting(SettingDef::float("projection_blend", 0.0))
            .setting(SettingDef::enumeration("extension", &["REPEAT", "EXTEND", "CLIP", "MIRROR"], "REPEAT"))
            .input(vector_in("Vector", "Vector", [0.0; 3]))
            .output(Socket::output("Color", SocketType::Color))
            .output(Socket::output("Alpha", SocketType::Float))
            .width(240.0),
    );

    registry.register(
        NodeKind::new("ShaderNodeBsdfPrincipled", "Principled BSDF", NodeCategory::Shader)
            .setting(SettingDef::enumeration("distribution", &["GGX", "MULTI_GGX"], "MULTI_GGX"))
            .setting(SettingDef::enumeration(
                "subsurface_method",
                &["BURLEY", "RANDOM_WALK", "RANDOM_WALK_SKIN"],
                "RANDOM_WALK",
            ))
            .input(color_in("Base Color", "Base Color", [0.8, 0.8, 0.8, 1.0]))
            .input(float_in("Metallic", "Metallic", 0.0))
            .input(float_in("Roughness", "Roughness", 0.5))
            .input(float_in("IOR", "IOR", 1.5))
            .input(float_in("Alpha", "Alpha", 1.0))
            .input(vector_in("Normal", "Normal", [0.0; 3]))
            .input(color_in("Emission Color", "Emission Color", [1.0, 1.0, 1.0, 1.0]))
            .input(float_in("Emission Strength", "Emission Strength", 0.0))
            .output(Socket::output("BSDF", SocketType::Shader))
            .width(240.0),
    );

    registry.register(
        NodeKind::new("ShaderNodeOutputMaterial", "Material Output", NodeCategory::Output)
            .setting(SettingDef::enumeration("target", &["ALL", "EEVEE", "CYCLES"], "ALL"))
            .setting(SettingDef::boolean("is_active_output", true))
            .input(Socket::input("Surface", SocketType::Shader))
            .input(Socket::input("Volume", SocketType::Shader))
            .input(vector_in("Displacement", "Displacement", [0.0; 3])),
    );

    registry.register(
        NodeKind::new("ShaderNodeValue", "Value", NodeCategory::Input)
            .output(Socket::output("Value", SocketType::Float).with_default(SocketValue::Float(0.5))),
    );

    registry.register(
        NodeKind::new("ShaderNodeRGB", "RGB", NodeCategory::Input).output(
            Socket::output("Color", SocketType::Color)
                .with_default(SocketValue::Color([0.5, 0.5, 0.5, 1.0])),
        ),
    );
}
