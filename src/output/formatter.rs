//! Output formatters for analysis results

use crate::config::OutputFormat;
use crate::error::{Result, ResumeLensError};
use crate::output::report::*;
use askama::Template;
use chrono::{DateTime, Utc};
use colored::{Color, Colorize};
use std::path::Path;

/// Facts about the run that are not part of the analysis itself.
#[derive(Debug, Clone)]
pub struct ReportContext {
    pub source_file: Option<String>,
    pub generated_at: DateTime<Utc>,
}

impl ReportContext {
    pub fn new(source_file: Option<String>) -> Self {
        Self {
            source_file,
            generated_at: Utc::now(),
        }
    }

    fn generated_label(&self) -> String {
        self.generated_at.format("%Y-%m-%d %H:%M:%S UTC").to_string()
    }
}

/// Trait for formatting an analysis view
pub trait OutputFormatter {
    fn format_report(&self, view: &AnalysisView, context: &ReportContext) -> Result<String>;
    fn supports_format(&self) -> OutputFormat;
}

/// Terminal output with optional colors and clickable links
pub struct ConsoleFormatter {
    use_colors: bool,
}

/// JSON formatter for piping into other tools
pub struct JsonFormatter {
    pretty: bool,
}

pub struct MarkdownFormatter {
    include_metadata: bool,
}

/// Standalone HTML page
pub struct HtmlFormatter {
    include_styles: bool,
}

/// Report generator that coordinates different formatters
pub struct ReportGenerator {
    console_formatter: ConsoleFormatter,
    json_formatter: JsonFormatter,
    markdown_formatter: MarkdownFormatter,
    html_formatter: HtmlFormatter,
}

#[derive(Template)]
#[template(source = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Resume Analysis</title>
    {% if include_styles %}
    <style>
        body {
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
            line-height: 1.6;
            color: #333;
            max-width: 800px;
            margin: 0 auto;
            padding: 20px;
            background: #f8f9fa;
        }
        .container {
            background: white;
            padding: 30px;
            border-radius: 8px;
            box-shadow: 0 2px 10px rgba(0,0,0,0.1);
        }
        h2 {
            color: #007acc;
            border-bottom: 2px solid #e9ecef;
            padding-bottom: 10px;
        }
        .skills { list-style: none; padding: 0; }
        .skill-tag {
            display: inline-block;
            background: #e7f3fb;
            color: #007acc;
            padding: 4px 12px;
            border-radius: 16px;
            margin: 4px;
        }
        .role {
            background: #f8f9fa;
            padding: 15px;
            margin: 10px 0;
            border-radius: 6px;
            border-left: 4px solid #17a2b8;
        }
        .role a { font-weight: bold; color: #007acc; }
        .metadata {
            margin-top: 30px;
            font-size: 0.9em;
            color: #6c757d;
        }
    </style>
    {% endif %}
</head>
<body>
    <div class="container">
        <h1>Resume Analysis</h1>

        <section class="experience">
            <h2>Experience Level</h2>
            <p>{{ experience_level }}</p>
        </section>

        <section>
            <h2>Skills</h2>
            <ul class="skills">
            {% for tag in skill_tags %}
                <li class="skill-tag">{{ tag.label }}</li>
            {% endfor %}
            </ul>
        </section>

        <section>
            <h2>Recommended Roles</h2>
            {% for role in roles %}
            <div class="role">
                <a href="{{ role.href }}" target="_blank" rel="noopener noreferrer">{{ role.title }}</a>
                <p>{{ role.reason }}</p>
            </div>
            {% endfor %}
        </section>

        <div class="metadata">
            <p>Generated: {{ generated_at }}{% if has_source_file %} | File: {{ source_file }}{% endif %}</p>
        </div>
    </div>
</body>
</html>"#, ext = "html")]
struct HtmlTemplate<'a> {
    include_styles: bool,
    experience_level: &'a str,
    skill_tags: &'a [SkillTag],
    roles: &'a [RoleLink],
    generated_at: String,
    has_source_file: bool,
    source_file: &'a str,
}

/// Server text must not reach the terminal with its own escape sequences.
fn strip_controls(text: &str) -> String {
    text.chars().filter(|c| !c.is_control()).collect()
}

impl ConsoleFormatter {
    pub fn new(use_colors: bool) -> Self {
        Self { use_colors }
    }

    fn colorize(&self, text: &str, color: Color) -> String {
        if self.use_colors {
            text.color(color).to_string()
        } else {
            text.to_string()
        }
    }

    fn format_header(&self, title: &str, level: u8) -> String {
        let prefix = match level {
            1 => "█",
            2 => "▓",
            _ => "░",
        };

        let color = match level {
            1 => Color::Blue,
            2 => Color::Green,
            _ => Color::White,
        };

        if self.use_colors {
            format!("\n{} {}\n", prefix.color(color).bold(), title.color(color).bold())
        } else {
            format!("\n{} {}\n", prefix, title)
        }
    }

    /// OSC 8 hyperlink when colors are on, plain `title <url>` otherwise.
    fn format_link(&self, role: &RoleLink) -> String {
        let title = strip_controls(&role.title);
        let href = strip_controls(&role.href);

        if self.use_colors && !href.is_empty() {
            format!(
                "\x1b]8;;{}\x1b\\{}\x1b]8;;\x1b\\ {}",
                href,
                title.bold(),
                "↗".dimmed()
            )
        } else if href.is_empty() {
            title
        } else {
            format!("{} <{}>", title, href)
        }
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format_report(&self, view: &AnalysisView, context: &ReportContext) -> Result<String> {
        let mut output = String::new();

        output.push_str(&self.format_header("RESUME ANALYSIS", 1));
        if let Some(file) = &context.source_file {
            output.push_str(&format!("File: {}\n", strip_controls(file)));
        }

        output.push_str(&self.format_header("Experience Level", 2));
        let level = strip_controls(&view.experience_level);
        output.push_str(&format!("{}\n", self.colorize(&level, Color::Cyan)));

        output.push_str(&self.format_header("Skills", 2));
        let tags: Vec<String> = view
            .skill_tags
            .iter()
            .map(|tag| self.colorize(&format!("[{}]", strip_controls(&tag.label)), Color::Yellow))
            .collect();
        if !tags.is_empty() {
            output.push_str(&tags.join(" "));
            output.push('\n');
        }

        output.push_str(&self.format_header("Recommended Roles", 2));
        for (i, role) in view.roles.iter().enumerate() {
            output.push_str(&format!("{}. {}\n", i + 1, self.format_link(role)));
            output.push_str(&format!("   {}\n", strip_controls(&role.reason)));
        }

        Ok(output)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Console
    }
}

impl JsonFormatter {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_report(&self, view: &AnalysisView, _context: &ReportContext) -> Result<String> {
        if self.pretty {
            Ok(serde_json::to_string_pretty(view)?)
        } else {
            Ok(serde_json::to_string(view)?)
        }
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Json
    }
}

impl MarkdownFormatter {
    pub fn new(include_metadata: bool) -> Self {
        Self { include_metadata }
    }
}

impl OutputFormatter for MarkdownFormatter {
    fn format_report(&self, view: &AnalysisView, context: &ReportContext) -> Result<String> {
        let mut output = String::new();

        output.push_str("# Resume Analysis\n\n");

        if self.include_metadata {
            output.push_str(&format!("**Generated:** {}", context.generated_label()));
            if let Some(file) = &context.source_file {
                output.push_str(&format!(" | **File:** `{}`", file));
            }
            output.push_str("\n\n");
        }

        output.push_str("## Experience Level\n\n");
        output.push_str(&format!("{}\n\n", view.experience_level));

        output.push_str("## Skills\n\n");
        for tag in &view.skill_tags {
            output.push_str(&format!("- `{}`\n", tag.label));
        }
        output.push('\n');

        output.push_str("## Recommended Roles\n\n");
        for role in &view.roles {
            output.push_str(&format!("### [{}]({})\n\n", role.title, role.href));
            output.push_str(&format!("{}\n\n", role.reason));
        }

        Ok(output)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Markdown
    }
}

impl HtmlFormatter {
    pub fn new(include_styles: bool) -> Self {
        Self { include_styles }
    }
}

impl OutputFormatter for HtmlFormatter {
    fn format_report(&self, view: &AnalysisView, context: &ReportContext) -> Result<String> {
        let template = HtmlTemplate {
            include_styles: self.include_styles,
            experience_level: &view.experience_level,
            skill_tags: &view.skill_tags,
            roles: &view.roles,
            generated_at: context.generated_label(),
            has_source_file: context.source_file.is_some(),
            source_file: context.source_file.as_deref().unwrap_or_default(),
        };

        template
            .render()
            .map_err(|e| ResumeLensError::OutputFormatting(e.to_string()))
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Html
    }
}

impl ReportGenerator {
    pub fn new() -> Self {
        Self::with_options(true, true, true, true)
    }

    pub fn with_options(
        use_colors: bool,
        pretty_json: bool,
        include_metadata: bool,
        include_html_styles: bool,
    ) -> Self {
        Self {
            console_formatter: ConsoleFormatter::new(use_colors),
            json_formatter: JsonFormatter::new(pretty_json),
            markdown_formatter: MarkdownFormatter::new(include_metadata),
            html_formatter: HtmlFormatter::new(include_html_styles),
        }
    }

    pub fn generate_report(
        &self,
        view: &AnalysisView,
        context: &ReportContext,
        format: &OutputFormat,
    ) -> Result<String> {
        match format {
            OutputFormat::Console => self.console_formatter.format_report(view, context),
            OutputFormat::Json => self.json_formatter.format_report(view, context),
            OutputFormat::Markdown => self.markdown_formatter.format_report(view, context),
            OutputFormat::Html => self.html_formatter.format_report(view, context),
        }
    }
}

impl Default for ReportGenerator {
    fn default() -> Self {
        Self::new()
    }
}

pub fn save_report_to_file(content: &str, file_path: &Path) -> Result<()> {
    use std::fs;
    if let Some(parent) = file_path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(file_path, content)?;
    Ok(())
}

pub fn suggest_filename(format: &OutputFormat, resume_name: &str, timestamp: bool) -> String {
    let base_name = Path::new(resume_name)
        .file_stem()
        .unwrap_or_default()
        .to_string_lossy();

    let timestamp_suffix = if timestamp {
        format!("_{}", Utc::now().format("%Y%m%d_%H%M%S"))
    } else {
        String::new()
    };

    match format {
        OutputFormat::Console => format!("{}_analysis{}.txt", base_name, timestamp_suffix),
        OutputFormat::Json => format!("{}_analysis{}.json", base_name, timestamp_suffix),
        OutputFormat::Markdown => format!("{}_analysis{}.md", base_name, timestamp_suffix),
        OutputFormat::Html => format!("{}_analysis{}.html", base_name, timestamp_suffix),
    }
}
