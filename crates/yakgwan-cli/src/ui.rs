//! UI utilities for the CLI

use colored::*;
use crossterm::{
    event::{self, Event, KeyCode, KeyModifiers},
    terminal::{disable_raw_mode, enable_raw_mode, size},
};
use std::io::{self, IsTerminal, Write};

use yakgwan_core::{AnswerResult, Error, IndexStats, Result, SourceRef};

use crate::chat::{EXAMPLE_QUESTIONS, ERROR_APOLOGY, Speaker, Transcript};

const PROMPT: &str = "약관>";

/// Characters of each hit shown in the debug panel
pub const DEBUG_PREVIEW_CHARS: usize = 200;

/// Display startup banner
pub fn display_banner() {
    let terminal_width = size().map(|(w, _)| w as usize).unwrap_or(80);
    let banner_width = std::cmp::min(67, terminal_width.saturating_sub(4)).max(40);

    let top_border = format!("┌{}┐", "─".repeat(banner_width - 2));
    let bottom_border = format!("└{}┘", "─".repeat(banner_width - 2));
    let empty_line = format!("│{}│", " ".repeat(banner_width - 2));

    println!();
    println!("{}", top_border.blue());
    println!("{}", empty_line.blue());

    let title = "Yakgwan - 보험 약관 챗봇";
    println!(
        "│  {}{}│",
        title.blue().bold(),
        " ".repeat(padding(banner_width, title))
    );
    println!("{}", empty_line.blue());

    let feature_lines = [
        "보험 약관에 대해 궁금한 것을 물어보세요",
        "",
        "• 약관 검색 후 참고자료와 함께 답변",
        "• 1-5: 예시 질문, examples: 예시 목록",
        "• ↑/↓: 이전 질문, debug: 디버그 정보",
        "",
        "v0.1.0 • Pinecone + OpenAI",
    ];

    for line in feature_lines {
        if line.is_empty() {
            println!("{}", empty_line.blue());
        } else {
            let content = format!("│  {}{}│", line, " ".repeat(padding(banner_width, line)));
            println!("{}", content.blue());
        }
    }

    println!("{}", empty_line.blue());
    println!("{}", bottom_border.blue());
    println!();
    println!(
        "{}",
        "💡 Tip: 질문을 입력하거나 'help'로 명령어를 확인하세요".dimmed()
    );
    println!();
}

fn padding(banner_width: usize, line: &str) -> usize {
    banner_width.saturating_sub(display_width(line) + 4)
}

// Hangul and other wide glyphs take two terminal columns.
fn display_width(text: &str) -> usize {
    text.chars()
        .map(|c| if c >= '\u{1100}' && !('\u{2000}'..='\u{27FF}').contains(&c) { 2 } else { 1 })
        .sum()
}

/// Handle input with question history navigation
pub async fn handle_input_with_history(history: &mut Vec<String>) -> Result<String> {
    // Piped input has no key events
    if !io::stdin().is_terminal() {
        let mut input = String::new();
        if io::stdin().read_line(&mut input)? == 0 {
            return Ok("exit".to_string());
        }
        let input = input.trim().to_string();
        if !input.is_empty() {
            history.push(input.clone());
        }
        return Ok(input);
    }

    enable_raw_mode()?;
    let result = read_line_raw(history);
    disable_raw_mode()?;
    println!();

    let input = result?;
    if !input.trim().is_empty() {
        history.push(input.clone());
    }
    Ok(input)
}

fn read_line_raw(history: &[String]) -> Result<String> {
    let mut input = String::new();
    let mut history_index: Option<usize> = None;

    redraw(&input, 0)?;

    loop {
        let Event::Key(key_event) = event::read()? else {
            continue;
        };
        let previous_width = display_width(&input);

        match key_event.code {
            KeyCode::Enter => return Ok(input),
            KeyCode::Esc => return Ok(String::new()),
            KeyCode::Char('c') if key_event.modifiers.contains(KeyModifiers::CONTROL) => {
                return Ok("exit".to_string());
            }
            KeyCode::Char(c) => input.push(c),
            KeyCode::Backspace => {
                input.pop();
            }
            KeyCode::Up if !history.is_empty() => {
                let new_index = match history_index {
                    None => history.len() - 1,
                    Some(idx) => idx.saturating_sub(1),
                };
                history_index = Some(new_index);
                input = history[new_index].clone();
            }
            KeyCode::Down => match history_index {
                Some(idx) if idx + 1 < history.len() => {
                    history_index = Some(idx + 1);
                    input = history[idx + 1].clone();
                }
                Some(_) => {
                    history_index = None;
                    input.clear();
                }
                None => {}
            },
            _ => continue,
        }

        redraw(&input, previous_width)?;
    }
}

fn redraw(input: &str, previous_width: usize) -> Result<()> {
    let stale = previous_width.saturating_sub(display_width(input));
    print!(
        "\r{} {}{}\r{} {}",
        PROMPT.green().bold(),
        input,
        " ".repeat(stale),
        PROMPT.green().bold(),
        input
    );
    io::stdout().flush()?;
    Ok(())
}

/// Display help message
pub fn print_help() {
    println!("{}", "사용 가능한 명령어:".bold());
    println!("  {} - 보험 약관에 대한 질문", "<질문>".green());
    println!("  {} - 예시 질문 바로 보내기", "1-5".green());
    println!("  {} - 예시 질문 목록", "examples".green());
    println!("  {} - 대화 기록 지우기", "clear".green());
    println!("  {} - 디버그 정보 켜기/끄기", "debug".green());
    println!("  {} - 도움말", "help".green());
    println!("  {} - 종료", "exit/quit".green());
    println!();
}

/// List the example questions with their shortcut numbers
pub fn print_examples() {
    println!("{}", "🎯 예시 질문:".bold());
    for (i, question) in EXAMPLE_QUESTIONS.iter().enumerate() {
        println!("  {} {}", format!("{}.", i + 1).cyan(), question);
    }
    println!();
}

/// One source entry: rank, score with 3 decimals, chunk index, then the content
pub fn format_source(rank: usize, source: &SourceRef) -> String {
    format!(
        "📄 참고자료 {} (점수: {:.3}, 청크: {})\n{}",
        rank, source.score, source.chunk_index, source.content
    )
}

/// Print an answer followed by its sources
pub fn render_answer(result: &AnswerResult) {
    println!("{} {}", "🤖".cyan(), result.answer);
    println!();

    if result.sources.is_empty() {
        return;
    }

    println!("{}", "📚 참고 자료".bold());
    for (i, source) in result.sources.iter().enumerate() {
        let rendered = format_source(i + 1, source);
        let (header, body) = rendered.split_once('\n').unwrap_or((rendered.as_str(), ""));
        println!("{}", header.blue().bold());
        println!("{}", body.dimmed());
        println!();
    }
}

/// Key/value lines describing the last answer, the index and the session
///
/// `stats` is `None` when the index could not be queried.
pub fn debug_report(
    result: Option<&AnswerResult>,
    stats: Option<&IndexStats>,
    transcript: &Transcript,
) -> Vec<(String, String)> {
    let mut report = Vec::new();
    let (questions, answers) = transcript.counts();
    report.push(("총 메시지 수".to_string(), transcript.len().to_string()));
    report.push(("사용자 질문 수".to_string(), questions.to_string()));
    report.push(("봇 응답 수".to_string(), answers.to_string()));

    match stats {
        Some(stats) => {
            report.push(("총 벡터 수".to_string(), stats.total_vector_count.to_string()));
            if let Some(dimension) = stats.dimension {
                report.push(("벡터 차원".to_string(), dimension.to_string()));
            }
            for (name, count) in &stats.namespaces {
                report.push((format!("네임스페이스 {}", name), format!("{}개", count)));
            }
        }
        None => report.push(("인덱스 상태".to_string(), "조회 실패".to_string())),
    }

    let Some(result) = result else {
        return report;
    };

    report.push(("검색 결과 수".to_string(), result.sources.len().to_string()));
    if let Some(average) = result.average_score() {
        report.push(("평균 검색 점수".to_string(), format!("{:.3}", average)));
    }
    report.push((
        "답변 길이".to_string(),
        format!("{}자", result.answer.chars().count()),
    ));

    for (i, source) in result.sources.iter().enumerate() {
        report.push((
            format!("검색 결과 {}", i + 1),
            format!(
                "id={} chunk={} source={} {}",
                source.id,
                source.chunk_index,
                source.source,
                preview(&source.content, DEBUG_PREVIEW_CHARS)
            ),
        ));
    }

    report
}

/// Print the debug panel
pub fn render_debug_panel(
    result: Option<&AnswerResult>,
    stats: Option<&IndexStats>,
    transcript: &Transcript,
) {
    println!("{}", "🔍 디버그 정보".yellow().bold());
    for (key, value) in debug_report(result, stats, transcript) {
        println!("  {}: {}", key.yellow(), value);
    }

    let recent = transcript.recent(6);
    if !recent.is_empty() {
        println!("  {}", "최근 대화:".yellow());
        for entry in recent {
            let icon = match entry.speaker {
                Speaker::User => "👤",
                Speaker::Assistant => "🤖",
            };
            println!(
                "    {} [{}] {}",
                icon,
                entry.timestamp.format("%H:%M:%S"),
                preview(&entry.content, 100)
            );
        }
    }
    println!();
}

/// Print index statistics
pub fn render_stats(stats: &IndexStats) {
    println!("{}", "📊 인덱스 정보".bold());
    println!("  총 벡터 수: {}", stats.total_vector_count);
    if let Some(dimension) = stats.dimension {
        println!("  벡터 차원: {}", dimension);
    }
    if stats.namespaces.is_empty() {
        println!("  네임스페이스: 없음");
    }
    for (name, count) in &stats.namespaces {
        println!("  네임스페이스 {}: {}개", name.cyan(), count);
    }
}

/// Print the generic apology; the error detail only in debug mode
pub fn render_error(error: &Error, debug: bool) {
    println!("{} {}", "❌".red(), ERROR_APOLOGY.red());
    if debug {
        println!("  {} {}", "상세 오류:".yellow(), error);
    }
    println!();
}

/// First `max_chars` characters of `text`, marked with `...` when cut
pub fn preview(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}
