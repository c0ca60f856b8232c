//! Markdown → ratatui Lines renderer.
//!
//! Analyses come back as markdown (headings, bullet lists of categories,
//! occasionally a table of totals). Converts to `Vec<Line<'static>>`.

use pulldown_cmark::{Event, HeadingLevel, Options, Parser, Tag, TagEnd};
use ratatui::{
    style::{Modifier, Style},
    text::{Line, Span},
};

use crate::tui::theme;

const CELL_SEPARATOR: &str = " │ ";

/// Convert markdown text to styled ratatui Lines.
pub fn markdown_to_lines(md: &str) -> Vec<Line<'static>> {
    let parser = Parser::new_ext(md, Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH);
    let mut lines: Vec<Line<'static>> = Vec::new();

    let mut current_spans: Vec<Span<'static>> = Vec::new();
    let mut style_stack: Vec<Style> = vec![Style::default()];

    let mut in_code_block = false;
    let mut list_depth: usize = 0;
    // Next number per nesting level; None for bullet lists
    let mut list_numbers: Vec<Option<u64>> = Vec::new();
    let mut in_heading = false;
    let mut cell_index: usize = 0;

    for event in parser {
        match event {
            // ── Headings ─────────────────────────────────────────
            Event::Start(Tag::Heading { level, .. }) => {
                flush_line(&mut current_spans, &mut lines);
                let style = match level {
                    HeadingLevel::H1 => Style::default().fg(theme::ACCENT).add_modifier(Modifier::BOLD),
                    HeadingLevel::H2 => Style::default()
                        .fg(theme::PRIMARY_LIGHT)
                        .add_modifier(Modifier::BOLD),
                    HeadingLevel::H3 => Style::default().fg(theme::SUCCESS),
                    _ => Style::default().fg(theme::TEXT).add_modifier(Modifier::BOLD),
                };
                style_stack.push(style);
                in_heading = true;
            }
            Event::End(TagEnd::Heading(_)) => {
                style_stack.pop();
                flush_line(&mut current_spans, &mut lines);
                in_heading = false;
            }

            // ── Bold / Italic / Strikethrough ────────────────────
            Event::Start(Tag::Strong) => {
                let base = current_style(&style_stack);
                style_stack.push(base.add_modifier(Modifier::BOLD));
            }
            Event::Start(Tag::Emphasis) => {
                let base = current_style(&style_stack);
                style_stack.push(base.add_modifier(Modifier::ITALIC));
            }
            Event::Start(Tag::Strikethrough) => {
                let base = current_style(&style_stack);
                style_stack.push(base.add_modifier(Modifier::CROSSED_OUT));
            }
            Event::End(TagEnd::Strong | TagEnd::Emphasis | TagEnd::Strikethrough) => {
                style_stack.pop();
            }

            // ── Code ─────────────────────────────────────────────
            Event::Code(code) => {
                current_spans.push(Span::styled(
                    format!(" {} ", code),
                    Style::default().fg(theme::TEXT).bg(theme::BG_SURFACE),
                ));
            }
            Event::Start(Tag::CodeBlock(_)) => {
                flush_line(&mut current_spans, &mut lines);
                in_code_block = true;
            }
            Event::End(TagEnd::CodeBlock) => {
                in_code_block = false;
                lines.push(Line::raw(""));
            }

            // ── Lists ────────────────────────────────────────────
            Event::Start(Tag::List(start)) => {
                flush_line(&mut current_spans, &mut lines);
                list_depth += 1;
                list_numbers.push(start);
            }
            Event::End(TagEnd::List(_)) => {
                list_depth = list_depth.saturating_sub(1);
                list_numbers.pop();
                if list_depth == 0 {
                    lines.push(Line::raw(""));
                }
            }
            Event::Start(Tag::Item) => {
                flush_line(&mut current_spans, &mut lines);
                let indent = "  ".repeat(list_depth.saturating_sub(1));
                let marker = match list_numbers.last_mut() {
                    Some(Some(n)) => {
                        let marker = format!("{indent}{n}. ");
                        *n += 1;
                        marker
                    }
                    _ => format!("{indent}• "),
                };
                current_spans.push(Span::styled(
                    marker,
                    Style::default().fg(theme::PRIMARY_LIGHT),
                ));
            }
            Event::End(TagEnd::Item) => {
                flush_line(&mut current_spans, &mut lines);
            }

            // ── Tables ───────────────────────────────────────────
            Event::Start(Tag::Table(_)) => {
                flush_line(&mut current_spans, &mut lines);
            }
            Event::Start(Tag::TableHead) => {
                cell_index = 0;
                let base = current_style(&style_stack);
                style_stack.push(base.fg(theme::ACCENT).add_modifier(Modifier::BOLD));
            }
            Event::End(TagEnd::TableHead) => {
                style_stack.pop();
                flush_line(&mut current_spans, &mut lines);
                lines.push(Line::styled(
                    "─".repeat(40),
                    Style::default().fg(theme::TEXT_DIM),
                ));
            }
            Event::Start(Tag::TableRow) => {
                cell_index = 0;
            }
            Event::End(TagEnd::TableRow) => {
                flush_line(&mut current_spans, &mut lines);
            }
            Event::Start(Tag::TableCell) => {
                if cell_index > 0 {
                    current_spans.push(Span::styled(
                        CELL_SEPARATOR,
                        Style::default().fg(theme::TEXT_DIM),
                    ));
                }
                cell_index += 1;
            }
            Event::End(TagEnd::Table) => {
                lines.push(Line::raw(""));
            }

            // ── Links ────────────────────────────────────────────
            Event::Start(Tag::Link { .. }) => {
                let style = Style::default()
                    .fg(theme::INFO)
                    .add_modifier(Modifier::UNDERLINED);
                style_stack.push(style);
            }
            Event::End(TagEnd::Link) => {
                style_stack.pop();
            }

            // ── Paragraphs ───────────────────────────────────────
            Event::End(TagEnd::Paragraph) => {
                flush_line(&mut current_spans, &mut lines);
                if !in_heading && list_depth == 0 {
                    lines.push(Line::raw(""));
                }
            }

            // ── Text content ─────────────────────────────────────
            Event::Text(text) => {
                if in_code_block {
                    for code_line in text.lines() {
                        lines.push(Line::styled(
                            format!("  {code_line}"),
                            Style::default().fg(theme::TEXT).bg(theme::BG_SURFACE),
                        ));
                    }
                } else {
                    let style = current_style(&style_stack);
                    current_spans.push(Span::styled(text.to_string(), style));
                }
            }

            // ── Breaks ───────────────────────────────────────────
            Event::SoftBreak => {
                current_spans.push(Span::raw(" "));
            }
            Event::HardBreak => {
                flush_line(&mut current_spans, &mut lines);
            }

            Event::Rule => {
                flush_line(&mut current_spans, &mut lines);
                lines.push(Line::styled(
                    "─".repeat(40),
                    Style::default().fg(theme::TEXT_DIM),
                ));
                lines.push(Line::raw(""));
            }

            // ── Block quote ──────────────────────────────────────
            Event::Start(Tag::BlockQuote) => {
                flush_line(&mut current_spans, &mut lines);
                let base = current_style(&style_stack);
                style_stack.push(base.fg(theme::TEXT_MUTED).add_modifier(Modifier::ITALIC));
                current_spans.push(Span::styled("│ ", Style::default().fg(theme::TEXT_DIM)));
            }
            Event::End(TagEnd::BlockQuote) => {
                flush_line(&mut current_spans, &mut lines);
                style_stack.pop();
            }

            _ => {}
        }
    }

    flush_line(&mut current_spans, &mut lines);

    while lines.last().is_some_and(|l| l.spans.is_empty() || l.to_string().is_empty()) {
        lines.pop();
    }

    lines
}

/// Plain text as unstyled lines (no markdown interpretation).
pub fn plain_lines(text: &str) -> Vec<Line<'static>> {
    text.lines().map(|l| Line::raw(l.to_string())).collect()
}

fn current_style(stack: &[Style]) -> Style {
    stack.last().copied().unwrap_or_default()
}

fn flush_line(spans: &mut Vec<Span<'static>>, lines: &mut Vec<Line<'static>>) {
    if !spans.is_empty() {
        lines.push(Line::from(std::mem::take(spans)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text_of(lines: &[Line<'static>]) -> String {
        lines
            .iter()
            .map(|l| l.to_string())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_plain_text() {
        let lines = markdown_to_lines("Total de gastos: R$ 2.300");
        assert_eq!(lines.len(), 1);
        assert!(lines[0].to_string().contains("R$ 2.300"));
    }

    #[test]
    fn test_bold_text() {
        let lines = markdown_to_lines("**Moradia**");
        assert!(lines[0]
            .spans
            .iter()
            .any(|s| s.style.add_modifier.contains(Modifier::BOLD)));
    }

    #[test]
    fn test_headings() {
        let lines = markdown_to_lines("# Resumo\n## Categorias\n### Sugestões");
        assert!(lines.len() >= 3);
        assert!(lines[0].spans.iter().any(|s| s.style.fg == Some(theme::ACCENT)));
        assert!(lines[1]
            .spans
            .iter()
            .any(|s| s.style.fg == Some(theme::PRIMARY_LIGHT)));
        assert!(lines[2].spans.iter().any(|s| s.style.fg == Some(theme::SUCCESS)));
    }

    #[test]
    fn test_bullet_list() {
        let lines = markdown_to_lines("- Aluguel\n- Mercado\n- Transporte");
        let text = text_of(&lines);
        assert_eq!(text.matches('•').count(), 3);
    }

    #[test]
    fn test_numbered_list() {
        let lines = markdown_to_lines("1. Cozinhar em casa\n2. Cancelar assinaturas");
        let text = text_of(&lines);
        assert!(text.contains("1. Cozinhar"));
        assert!(text.contains("2. Cancelar"));
    }

    #[test]
    fn test_table_rows() {
        let md = "| Categoria | Valor |\n|---|---|\n| Moradia | 1500 |\n| Mercado | 800 |";
        let lines = markdown_to_lines(md);
        let text = text_of(&lines);
        assert!(text.contains("Categoria │ Valor"));
        assert!(text.contains("Moradia │ 1500"));
        assert!(text.contains("Mercado │ 800"));
    }

    #[test]
    fn test_code_block_lines() {
        let lines = markdown_to_lines("```\nlinha 1\nlinha 2\n```");
        let coded: Vec<_> = lines
            .iter()
            .filter(|l| l.style.bg == Some(theme::BG_SURFACE))
            .collect();
        assert_eq!(coded.len(), 2);
        assert_eq!(coded[0].to_string(), "  linha 1");
    }

    #[test]
    fn test_plain_lines_keeps_markup() {
        let lines = plain_lines("**a**\nb");
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].to_string(), "**a**");
    }

    #[test]
    fn test_empty_input() {
        assert!(markdown_to_lines("").is_empty());
    }
}
