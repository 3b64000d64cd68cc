//! Interactive chat loop

use colored::*;

use yakgwan_core::{AnswerResult, IndexStats, RAGEngine, Result};

use crate::chat::{ChatCommand, Transcript};
use crate::ui::{
    display_banner, handle_input_with_history, print_examples, print_help, render_answer,
    render_debug_panel, render_error,
};

/// Run the chat session until the user exits
pub async fn run_chat<E: RAGEngine + ?Sized>(engine: &E, debug_mode: bool) -> Result<()> {
    let mut debug_mode = debug_mode;
    let mut transcript = Transcript::new();
    let mut history = Vec::new();
    let mut last_result: Option<AnswerResult> = None;

    display_banner();
    print_examples();

    loop {
        let input = handle_input_with_history(&mut history).await?;

        let question = match ChatCommand::parse(&input) {
            ChatCommand::Empty => continue,
            ChatCommand::Exit => {
                println!("{}", "👋 안녕히 가세요!".green());
                break;
            }
            ChatCommand::Help => {
                print_help();
                continue;
            }
            ChatCommand::Examples => {
                print_examples();
                continue;
            }
            ChatCommand::Clear => {
                transcript.clear();
                last_result = None;
                println!("{} 대화 기록을 지웠습니다.", "🗑️".cyan());
                continue;
            }
            ChatCommand::ToggleDebug => {
                debug_mode = !debug_mode;
                let state = if debug_mode { "켜짐" } else { "꺼짐" };
                println!("{} 디버그 모드: {}", "🐛".yellow(), state);
                if debug_mode {
                    let stats = index_stats(engine).await;
                    render_debug_panel(last_result.as_ref(), stats.as_ref(), &transcript);
                }
                continue;
            }
            ChatCommand::Ask(question) => question,
        };

        transcript.push_question(&question);
        println!("{} 보험 약관을 검색하고 답변을 생성하는 중...", "🔍".blue());

        match engine.ask(&question).await {
            Ok(result) => {
                render_answer(&result);
                transcript.push_answer(&result);
                if debug_mode {
                    println!(
                        "{} 답변 생성 완료: {}개 참고자료, {}자 답변",
                        "✅".green(),
                        result.sources.len(),
                        result.answer.chars().count()
                    );
                    let stats = index_stats(engine).await;
                    render_debug_panel(Some(&result), stats.as_ref(), &transcript);
                }
                last_result = Some(result);
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to answer question");
                render_error(&e, debug_mode);
                transcript.push_error();
            }
        }
    }

    Ok(())
}

async fn index_stats<E: RAGEngine + ?Sized>(engine: &E) -> Option<IndexStats> {
    match engine.stats().await {
        Ok(stats) => Some(stats),
        Err(e) => {
            tracing::warn!(error = %e, "failed to fetch index stats");
            None
        }
    }
}
