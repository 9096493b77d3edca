//! Ask command - answers one question from the terminal

use clap::Args;

use crate::domain::AnswerRequest;
use crate::Services;

#[derive(Args, Debug)]
pub struct AskArgs {
    /// Subject namespace to search, e.g. CN or OS
    #[arg(long, short)]
    pub subject: String,

    /// Number of index matches to request
    #[arg(long)]
    pub top_k: Option<u32>,

    /// Also generate two follow-up questions
    #[arg(long)]
    pub followups: bool,

    /// The question to answer
    pub question: String,
}

pub async fn run(args: AskArgs) -> anyhow::Result<()> {
    let config = super::bootstrap()?;
    let services = Services::build(&config).await?;

    let mut request = AnswerRequest::new(args.subject, args.question);
    if let Some(top_k) = args.top_k {
        request = request.with_top_k(top_k);
    }

    let result = services.answers.ask(request.clone()).await?;

    println!("{}\n", result.answer);
    println!(
        "[{}] embed {}ms, query {}ms, completion {}ms{}",
        result.timing.response_time(),
        result.timing.embed_ms,
        result.timing.query_ms,
        result.timing.completion_ms,
        if result.cache_hit { ", cached embedding" } else { "" },
    );

    if args.followups {
        let followup = services.answers.followup(request).await?;
        println!();
        for (i, question) in followup.questions.iter().enumerate() {
            println!("{}. {}", i + 1, question);
        }
    }

    services.embeddings.persist().await?;

    Ok(())
}
