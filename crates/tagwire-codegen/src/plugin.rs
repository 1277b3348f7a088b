//! The protoc plugin driver.
//!
//! `protoc` starts the plugin, writes one encoded [`CodeGeneratorRequest`]
//! to its stdin and reads one encoded [`CodeGeneratorResponse`] from its
//! stdout. A [`Plugin`] walks that exchange through
//! [`PluginState::AwaitRequest`], [`PluginState::Processing`] and
//! [`PluginState::EmitResponse`].
//!
//! Failures never produce a partial file list: the response then carries
//! only the error message.

use crate::codegen::{self, GeneratedFile};
use crate::config::GeneratorConfig;
use crate::error::{Error, Result};
use crate::protocol::code_generator_response::{Feature, File};
use crate::protocol::{CodeGeneratorRequest, CodeGeneratorResponse, FileDescriptorProto};
use crate::resolver::resolve;
use std::collections::HashSet;
use std::io::{Read, Write};
use tagwire::Message;
use tracing::{debug, info, warn};

/// Where a [`Plugin`] is in its single request/response exchange
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PluginState {
    /// Nothing read yet
    AwaitRequest,
    /// Request received; resolving and generating
    Processing,
    /// Response ready to be written
    EmitResponse,
}

/// Drives one generator-host exchange
#[derive(Debug)]
pub struct Plugin {
    state: PluginState,
}

impl Default for Plugin {
    fn default() -> Self {
        Self::new()
    }
}

impl Plugin {
    pub fn new() -> Self {
        Self {
            state: PluginState::AwaitRequest,
        }
    }

    pub fn state(&self) -> PluginState {
        self.state
    }

    fn transition(&mut self, next: PluginState) {
        debug!(from = ?self.state, to = ?next, "plugin state change");
        self.state = next;
    }

    /// Turns an encoded request into the response to send back.
    ///
    /// Decoding, resolution and generation failures all end up in the
    /// response's `error` field.
    pub fn process(&mut self, request: &[u8]) -> CodeGeneratorResponse {
        self.transition(PluginState::Processing);

        let result = CodeGeneratorRequest::decode(request)
            .map_err(Error::from)
            .and_then(|request| generate(&request));

        let response = match result {
            Ok(files) => CodeGeneratorResponse {
                error: None,
                supported_features: Feature::Proto3Optional.into(),
                file: files
                    .into_iter()
                    .map(|file| File {
                        name: file.name,
                        insertion_point: String::new(),
                        content: file.content,
                    })
                    .collect(),
            },
            Err(err) => {
                warn!(error = %err, "generation failed");
                CodeGeneratorResponse {
                    supported_features: Feature::Proto3Optional.into(),
                    ..CodeGeneratorResponse::from_error(err.to_string())
                }
            }
        };

        self.transition(PluginState::EmitResponse);
        response
    }

    /// Reads a request from `input` until EOF and writes the response to
    /// `output`.
    ///
    /// Only I/O failures are returned; everything else is reported inside
    /// the response.
    pub fn run<R: Read, W: Write>(&mut self, mut input: R, mut output: W) -> Result<()> {
        let mut request = Vec::new();
        input.read_to_end(&mut request)?;
        debug!(bytes = request.len(), "read request");

        let response = self.process(&request);
        let encoded = response.encode_to_vec();
        output.write_all(&encoded)?;
        output.flush()?;
        debug!(bytes = encoded.len(), files = response.file.len(), "wrote response");
        Ok(())
    }
}

/// Generates the files a request asks for, using its `parameter` as
/// configuration.
pub fn generate(request: &CodeGeneratorRequest) -> Result<Vec<GeneratedFile>> {
    if let Some(version) = &request.compiler_version {
        debug!(%version, "request from protoc");
    }
    let config = GeneratorConfig::parse(&request.parameter)?;
    generate_files(&request.proto_file, &request.file_to_generate, &config)
}

/// Resolves `proto_files` and generates one output per name in
/// `to_generate`, followed by the `mod.rs` index when enabled.
///
/// Outputs come back in request order.
pub fn generate_files(
    proto_files: &[FileDescriptorProto],
    to_generate: &[String],
    config: &GeneratorConfig,
) -> Result<Vec<GeneratedFile>> {
    let supplied: HashSet<&str> = proto_files.iter().map(|file| file.name.as_str()).collect();
    if let Some(missing) = to_generate.iter().find(|name| !supplied.contains(name.as_str())) {
        return Err(Error::UnknownFileToGenerate {
            name: missing.clone(),
        });
    }

    let schema = resolve(proto_files)?;

    let mut targets = Vec::with_capacity(to_generate.len());
    for name in to_generate {
        let id = schema
            .file_by_name(name)
            .ok_or_else(|| Error::UnknownFileToGenerate { name: name.clone() })?;
        if !targets.contains(&id) {
            targets.push(id);
        }
    }

    let mut outputs = Vec::with_capacity(targets.len() + 1);
    let mut names = HashSet::new();
    let mut push = |file: GeneratedFile, outputs: &mut Vec<GeneratedFile>| {
        if !names.insert(file.name.clone()) {
            return Err(Error::DuplicateOutput { name: file.name });
        }
        outputs.push(file);
        Ok(())
    };

    for &id in &targets {
        push(codegen::generate_file(&schema, id, config)?, &mut outputs)?;
    }
    if config.emit_index && !targets.is_empty() {
        push(codegen::generate_index(&schema, &targets, config)?, &mut outputs)?;
    }

    info!(files = outputs.len(), "generation complete");
    Ok(outputs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::field_descriptor_proto::Type;
    use crate::testing::*;

    fn request(files: Vec<FileDescriptorProto>, to_generate: &[&str], parameter: &str) -> CodeGeneratorRequest {
        CodeGeneratorRequest {
            file_to_generate: to_generate.iter().map(|s| s.to_string()).collect(),
            parameter: parameter.into(),
            proto_file: files,
            compiler_version: None,
        }
    }

    fn simple_file() -> FileDescriptorProto {
        let mut proto = file("simple.proto", "simple");
        proto.message_type.push(message("Test1", vec![scalar("a", 1, Type::Int32)]));
        proto
    }

    #[test]
    fn test_process_success() {
        let mut plugin = Plugin::new();
        assert_eq!(plugin.state(), PluginState::AwaitRequest);

        let bytes = request(vec![simple_file()], &["simple.proto"], "").encode_to_vec();
        let response = plugin.process(&bytes);

        assert_eq!(plugin.state(), PluginState::EmitResponse);
        assert_eq!(response.error, None);
        assert_eq!(response.supported_features, 1);
        let names: Vec<_> = response.file.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["simple.rs", "mod.rs"]);
        assert!(response.file[0].content.contains("pub struct Test1 {"));
    }

    #[test]
    fn test_errors_become_error_response() {
        let mut plugin = Plugin::new();
        let bytes = request(vec![simple_file()], &["other.proto"], "").encode_to_vec();
        let response = plugin.process(&bytes);
        assert!(response.file.is_empty());
        assert!(response.error.unwrap().contains("other.proto"));

        let response = Plugin::new().process(&[0x0A, 0x05, b'a']);
        assert!(response.file.is_empty());
        assert!(response.error.unwrap().starts_with("failed to decode request"));

        let bytes = request(vec![simple_file()], &["simple.proto"], "bogus").encode_to_vec();
        let response = Plugin::new().process(&bytes);
        assert!(response.error.unwrap().contains("bogus"));
    }

    #[test]
    fn test_run_round_trip() {
        let bytes = request(vec![simple_file()], &["simple.proto"], "emit_index=false").encode_to_vec();
        let mut output = Vec::new();
        Plugin::new().run(bytes.as_slice(), &mut output).unwrap();

        let response = CodeGeneratorResponse::decode(&output).unwrap();
        assert_eq!(response.file.len(), 1);
        assert_eq!(response.file[0].name, "simple.rs");
    }

    #[test]
    fn test_only_requested_files_are_generated() {
        let mut dependency = file("dep.proto", "dep");
        dependency.message_type.push(message("Dep", vec![]));
        let mut main = file("main.proto", "main");
        main.dependency.push("dep.proto".into());
        main.message_type.push(message("Main", vec![typed("dep", 1, Type::Message, ".dep.Dep")]));

        let outputs = generate_files(
            &[dependency, main],
            &["main.proto".to_string(), "main.proto".to_string()],
            &GeneratorConfig::default(),
        )
        .unwrap();
        let names: Vec<_> = outputs.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["main.rs", "mod.rs"]);
        assert!(outputs[0].content.contains("::core::option::Option<super::dep::Dep>"));
    }

    #[test]
    fn test_colliding_outputs() {
        let files = vec![file("a/b.proto", ""), file("a_b.proto", "")];
        let result = generate_files(
            &files,
            &["a/b.proto".to_string(), "a_b.proto".to_string()],
            &GeneratorConfig::default(),
        );
        assert!(matches!(result, Err(Error::DuplicateOutput { name }) if name == "a_b.rs"));
    }
}
