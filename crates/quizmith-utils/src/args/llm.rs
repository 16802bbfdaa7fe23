use clap::Args;

/// One OpenAI-compatible service shared by every generative feature, with
/// per-feature model overrides.
#[derive(Debug, Clone, Args)]
pub struct LlmService {
    #[arg(long, required = false)]
    pub llm_key: Option<String>,
    #[arg(long, required = false, help = "Base url of an OpenAI-compatible API")]
    pub llm_api_base: Option<String>,
    #[arg(long, required = false)]
    pub llm_default_model: Option<String>,
    #[arg(long, required = false, help = "Model used for quiz generation")]
    pub quiz_model: Option<String>,
    #[arg(long, required = false, help = "Model used for answer explanations")]
    pub explain_model: Option<String>,
}
