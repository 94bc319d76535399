//! Command assembly for the template-construction tool.

use super::InvocationParams;
use crate::constants::flags;

/// A structured invocation of the external tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DbmCommand {
    program: String,
    args: Vec<String>,
}

impl DbmCommand {
    /// Build the invocation from resolved parameters.
    pub fn from_params(params: &InvocationParams) -> Self {
        let mut args = vec![
            flags::RIGID_MODEL_TARGET.to_string(),
            params.template_anat.clone(),
        ];

        if !params.n4 {
            args.push(flags::NO_N4.to_string());
        }
        args.extend([flags::TRANSFORM.to_string(), params.transform.clone()]);
        if params.float {
            args.push(flags::FLOAT.to_string());
        }

        args.extend([
            flags::AVERAGE_TYPE.to_string(),
            params.average_type.clone(),
            flags::GRADIENT_STEP.to_string(),
            params.gradient_step.to_string(),
            flags::MODEL_ITERATIONS.to_string(),
            params.model_iterations.to_string(),
            flags::MODELBUILD_COMMAND.to_string(),
            params.modelbuild_command.clone(),
            flags::CLUSTER_TYPE.to_string(),
            params.cluster_type.clone(),
            flags::WALLTIME.to_string(),
            params.walltime.clone(),
            flags::MEMORY_REQUEST.to_string(),
            params.memory_request.clone(),
            flags::LOCAL_THREADS.to_string(),
            params.local_threads.to_string(),
            params.level.to_string(),
            params.input_file.clone(),
        ]);

        Self {
            program: params.tool.clone(),
            args,
        }
    }

    /// Program to execute.
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Arguments passed to the program, in order.
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Render as a single shell command line terminated by a newline.
    ///
    /// Tokens are quoted only when they contain shell metacharacters, so
    /// splitting the line with POSIX rules yields `program` followed by `args`.
    pub fn render(&self) -> String {
        let mut line = shell_words::join(std::iter::once(&self.program).chain(&self.args));
        line.push('\n');
        line
    }
}

impl std::fmt::Display for DbmCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.render().trim_end())
    }
}
