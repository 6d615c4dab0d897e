use clap::{Args as ClapArgs, Parser, Subcommand};
use tester_core::calldata::CalldataCompiler;
use tester_core::decoder::{decode_contract_response, DecodeOptions, ResponseValue};
use tester_core::display::{display_type, felt_to_hex};
use tester_core::encoder::encode_form;
use tester_core::form::{initial_form_state, validate_submission, FlatForm};
use tester_core::Callable;
use tester_types::abi::StateMutability;
use tracing::{debug, info};

use crate::artifact_wrapper::ArtifactWrapper;

/// Build call arguments and read call results of a Starknet contract from its ABI
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub(crate) struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the functions of the contract
    Functions {
        #[command(flatten)]
        artifact: ArtifactArgs,

        #[arg(long = "state-mutability")]
        #[arg(value_name = "STATE_MUTABILITY")]
        #[arg(help = "Only list functions with this state mutability (view or external);")]
        state_mutability: Option<StateMutability>,
    },
    /// Print the initial form of a function
    Form {
        #[command(flatten)]
        artifact: ArtifactArgs,

        #[command(flatten)]
        function: FunctionArgs,
    },
    /// Validate and encode a filled in form
    Encode {
        #[command(flatten)]
        artifact: ArtifactArgs,

        #[command(flatten)]
        function: FunctionArgs,

        #[arg(long = "form")]
        #[arg(value_name = "JSON")]
        #[arg(help = "Specify the form as a JSON object keyed like the output of `form`;")]
        form: String,

        #[arg(long = "calldata")]
        #[arg(help = "Print the serialized calldata instead of the encoded arguments;")]
        calldata: bool,
    },
    /// Decode the result of a call
    Decode {
        #[command(flatten)]
        artifact: ArtifactArgs,

        #[command(flatten)]
        function: FunctionArgs,

        #[arg(long = "response")]
        #[arg(value_name = "JSON")]
        #[arg(help = "Specify the raw call result as JSON;")]
        response: String,

        #[arg(long = "as-text")]
        #[arg(help = "Render the decoded value as text;")]
        as_text: bool,

        #[arg(long = "show-as-string")]
        #[arg(help = "Show felts and byte arrays as ASCII where possible;")]
        show_as_string: bool,
    },
}

#[derive(ClapArgs, Debug)]
struct ArtifactArgs {
    #[arg(long = "artifact")]
    #[arg(env = "CAIRO_TESTER_ARTIFACT")]
    #[arg(value_name = "PATH")]
    #[arg(help = "Specify the path to a Sierra contract class or an ABI JSON array;")]
    artifact: ArtifactWrapper,
}

#[derive(ClapArgs, Debug)]
struct FunctionArgs {
    #[arg(long = "function")]
    #[arg(value_name = "NAME")]
    #[arg(help = "Specify the function, or `constructor`;")]
    function: String,
}

impl Args {
    /// Runs the selected command and returns what it prints.
    pub(crate) fn execute(&self) -> anyhow::Result<String> {
        match &self.command {
            Command::Functions { artifact, state_mutability } => {
                let abi = load(artifact);
                let mut lines = Vec::new();
                if state_mutability.is_none() {
                    if let Some(constructor) = abi.constructor() {
                        lines.push(describe(&Callable::from(constructor)));
                    }
                }
                for function in abi.functions() {
                    if state_mutability.is_some_and(|filter| filter != function.state_mutability)
                    {
                        continue;
                    }
                    lines.push(describe(&Callable::from(function)));
                }
                Ok(lines.join("\n"))
            }
            Command::Form { artifact, function } => {
                let abi = load(artifact);
                let callable = abi.callable(&function.function)?;
                Ok(serde_json::to_string_pretty(&initial_form_state(&callable))?)
            }
            Command::Encode { artifact, function, form, calldata } => {
                let abi = load(artifact);
                let callable = abi.callable(&function.function)?;
                let form_json: serde_json::Value = serde_json::from_str(form)?;
                let form = FlatForm::from_json(callable.name, callable.inputs, &form_json)?;
                validate_submission(abi, &callable, &form)?;

                if *calldata {
                    let felts = CalldataCompiler::new(abi).compile_form(&form)?;
                    let hex: Vec<String> = felts.iter().map(felt_to_hex).collect();
                    return Ok(serde_json::to_string(&hex)?);
                }

                let encoded = encode_form(abi, &form)?;
                Ok(serde_json::to_string(&encoded)?)
            }
            Command::Decode { artifact, function, response, as_text, show_as_string } => {
                let abi = load(artifact);
                let callable = abi.callable(&function.function)?;
                let response: ResponseValue = serde_json::from_str(response)?;
                let options = DecodeOptions { as_text: *as_text, show_as_string: *show_as_string };
                debug!("Decoding response of {} with {options:?}", callable.name);

                Ok(decode_contract_response(abi, callable.outputs, &response, options).to_string())
            }
        }
    }
}

fn load(artifact: &ArtifactArgs) -> &tester_core::ContractAbi {
    info!("Using artifact {}", artifact.artifact);
    &artifact.artifact.abi
}

/// `name(input: type, ...) -> (output, ...) [state mutability]`
fn describe(callable: &Callable<'_>) -> String {
    let inputs: Vec<String> = callable
        .inputs
        .iter()
        .map(|input| format!("{}: {}", input.name, display_type(&input.r#type)))
        .collect();
    let outputs: Vec<String> =
        callable.outputs.iter().map(|output| display_type(&output.r#type)).collect();

    let mut description = format!("{}({})", callable.name, inputs.join(", "));
    if !outputs.is_empty() {
        description.push_str(&format!(" -> ({})", outputs.join(", ")));
    }
    if let Some(state_mutability) = callable.state_mutability {
        description.push_str(&format!(" [{state_mutability}]"));
    }
    description
}
