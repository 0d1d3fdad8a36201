use crate::device::SetupError;

/// Pipeline stage an entry point belongs to.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl ShaderStage {
    fn to_naga(self) -> naga::ShaderStage {
        match self {
            ShaderStage::Vertex => naga::ShaderStage::Vertex,
            ShaderStage::Fragment => naga::ShaderStage::Fragment,
        }
    }
}

/// Embedded WGSL program plus the entry points the pipeline uses.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct ShaderSource {
    pub label: &'static str,
    pub wgsl: &'static str,
    pub vertex_entry: &'static str,
    pub fragment_entry: &'static str,
}

impl ShaderSource {
    /// Pass-through vertex stage, UV-as-color fragment stage.
    pub const QUAD: ShaderSource = ShaderSource {
        label: "quad shader",
        wgsl: include_str!("shaders/quad.wgsl"),
        vertex_entry: "vs_main",
        fragment_entry: "fs_main",
    };

    /// Parses and validates the source, then checks both entry points exist.
    ///
    /// This runs before any device call so a broken program never reaches
    /// pipeline creation.
    pub fn compile(&self) -> Result<CompiledShader, SetupError> {
        let module = naga::front::wgsl::parse_str(self.wgsl).map_err(|e| {
            SetupError::ShaderParse {
                label: self.label.to_string(),
                message: e.emit_to_string(self.wgsl),
            }
        })?;

        let mut validator = naga::valid::Validator::new(
            naga::valid::ValidationFlags::all(),
            naga::valid::Capabilities::default(),
        );
        validator
            .validate(&module)
            .map_err(|e| SetupError::ShaderValidation {
                label: self.label.to_string(),
                message: e.emit_to_string(self.wgsl),
            })?;

        for (stage, name) in [
            (ShaderStage::Vertex, self.vertex_entry),
            (ShaderStage::Fragment, self.fragment_entry),
        ] {
            let found = module
                .entry_points
                .iter()
                .any(|ep| ep.name == name && ep.stage == stage.to_naga());
            if !found {
                return Err(SetupError::MissingEntryPoint {
                    label: self.label.to_string(),
                    stage,
                    name: name.to_string(),
                });
            }
        }

        log::debug!(
            "compiled `{}` ({} entry points)",
            self.label,
            module.entry_points.len()
        );

        Ok(CompiledShader { source: *self })
    }
}

impl Default for ShaderSource {
    fn default() -> Self {
        Self::QUAD
    }
}

/// A shader that passed validation and exposes both requested entry points.
///
/// Only obtainable through [`ShaderSource::compile`].
#[derive(Debug, Clone)]
pub struct CompiledShader {
    source: ShaderSource,
}

impl CompiledShader {
    pub fn label(&self) -> &'static str {
        self.source.label
    }

    pub fn wgsl(&self) -> &'static str {
        self.source.wgsl
    }

    pub fn vertex_entry(&self) -> &'static str {
        self.source.vertex_entry
    }

    pub fn fragment_entry(&self) -> &'static str {
        self.source.fragment_entry
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BROKEN: &str = "@vertex fn vs_main( -> {";

    const FRAGMENT_ONLY: &str = r#"
@fragment
fn fs_main() -> @location(0) vec4<f32> {
    return vec4<f32>(1.0, 0.0, 0.0, 1.0);
}
"#;

    const TYPE_ERROR: &str = r#"
@vertex
fn vs_main() -> @builtin(position) vec4<f32> {
    let x: f32 = true;
    return vec4<f32>(x, 0.0, 0.0, 1.0);
}
"#;

    #[test]
    fn embedded_quad_shader_compiles() {
        let compiled = ShaderSource::QUAD.compile().unwrap();
        assert_eq!(compiled.vertex_entry(), "vs_main");
        assert_eq!(compiled.fragment_entry(), "fs_main");
    }

    #[test]
    fn syntax_error_is_parse_failure() {
        let src = ShaderSource { wgsl: BROKEN, ..ShaderSource::QUAD };
        assert!(matches!(src.compile(), Err(SetupError::ShaderParse { .. })));
    }

    #[test]
    fn type_error_is_reported() {
        let src = ShaderSource { wgsl: TYPE_ERROR, ..ShaderSource::QUAD };
        assert!(matches!(
            src.compile(),
            Err(SetupError::ShaderParse { .. } | SetupError::ShaderValidation { .. })
        ));
    }

    #[test]
    fn missing_vertex_entry_point() {
        let src = ShaderSource { wgsl: FRAGMENT_ONLY, ..ShaderSource::QUAD };
        match src.compile() {
            Err(SetupError::MissingEntryPoint { stage, name, .. }) => {
                assert_eq!(stage, ShaderStage::Vertex);
                assert_eq!(name, "vs_main");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn misnamed_fragment_entry_point() {
        let src = ShaderSource { fragment_entry: "ps_main", ..ShaderSource::QUAD };
        match src.compile() {
            Err(SetupError::MissingEntryPoint { stage, name, .. }) => {
                assert_eq!(stage, ShaderStage::Fragment);
                assert_eq!(name, "ps_main");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn entry_point_stage_must_match() {
        // `fs_main` exists, but not as a vertex stage.
        let src = ShaderSource { vertex_entry: "fs_main", ..ShaderSource::QUAD };
        assert!(matches!(
            src.compile(),
            Err(SetupError::MissingEntryPoint { stage: ShaderStage::Vertex, .. })
        ));
    }
}
