// SPDX-License-Identifier: AGPL-3.0-or-later
//! Backend implementations and the pieces they share

pub mod comrak;
pub mod pulldown;

pub use self::comrak::ComrakBackend;
pub use self::pulldown::PulldownBackend;

use crate::options::EffectiveConfig;
use crate::page::PageShell;
use crate::title::sniff_title;
use crate::toc::{render_toc, TocEntry};
use crate::traits::{BackendDescriptor, ConversionError, Result};

/// Identifier of the backend used when none, or an unknown one, is requested
pub const DEFAULT_BACKEND_ID: &str = "cm";

/// Fails when LaTeX output is requested; neither backend renders it.
fn ensure_html(config: &EffectiveConfig, backend: BackendDescriptor) -> Result<()> {
    if config.render_latex {
        return Err(ConversionError::Unsupported {
            backend: backend.name,
            feature: "LaTeX output",
        });
    }
    Ok(())
}

fn decode(input: &[u8], backend: BackendDescriptor) -> Result<&str> {
    std::str::from_utf8(input).map_err(|e| ConversionError::Parse {
        backend: backend.name,
        message: format!("input is not valid UTF-8: {e}"),
    })
}

/// Put the TOC, the body and, for standalone pages, the shell together.
fn assemble(
    input: &[u8],
    config: &EffectiveConfig,
    toc: Option<&[TocEntry]>,
    body: &str,
) -> Vec<u8> {
    let mut content = String::with_capacity(body.len() + 256);
    if let Some(entries) = toc {
        content.push_str(&render_toc(entries));
    }
    if !config.toc_only {
        content.push_str(body);
    }

    if !config.standalone_page {
        return content.into_bytes();
    }

    let title = match config.title.as_deref().filter(|t| !t.is_empty()) {
        Some(title) => title.to_string(),
        None => {
            let title = sniff_title(input);
            tracing::debug!(title = %title, "sniffed page title");
            title
        }
    };
    PageShell {
        title: &title,
        css: &config.css_link,
    }
    .wrap(&content)
    .into_bytes()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::{normalize, RawOptions};
    use crate::traits::Backend;

    fn backends() -> [Box<dyn Backend>; 2] {
        [Box::new(ComrakBackend::new()), Box::new(PulldownBackend::new())]
    }

    fn render(backend: &dyn Backend, input: &str, raw: RawOptions) -> String {
        let out = backend
            .render(input.as_bytes(), &normalize(&raw))
            .expect("render succeeds");
        String::from_utf8(out).expect("utf-8 output")
    }

    #[test]
    fn test_latex_is_unsupported_everywhere() {
        let config = normalize(&RawOptions {
            latex: true,
            ..RawOptions::default()
        });
        for backend in backends() {
            let err = backend.render(b"# Hello\n", &config).unwrap_err();
            assert!(matches!(err, ConversionError::Unsupported { .. }));
        }
    }

    #[test]
    fn test_invalid_utf8_is_a_parse_failure() {
        for backend in backends() {
            let err = backend
                .render(&[b'#', b' ', 0xff, 0xfe], &EffectiveConfig::default())
                .unwrap_err();
            assert!(matches!(err, ConversionError::Parse { .. }));
        }
    }

    #[test]
    fn test_hello_world_fragment() {
        for backend in backends() {
            let html = render(backend.as_ref(), "# Hello\n\nWorld\n", RawOptions::default());
            assert!(html.contains("<h1>Hello</h1>"), "{html}");
            assert!(html.contains("<p>World</p>"), "{html}");
            assert!(!html.contains("<html>"));
        }
    }

    #[test]
    fn test_standalone_page_with_css() {
        for backend in backends() {
            let html = render(
                backend.as_ref(),
                "# Hello\n\nWorld\n",
                RawOptions {
                    page: true,
                    css: "style.css".into(),
                    ..RawOptions::default()
                },
            );
            assert!(html.starts_with("<!DOCTYPE html>"));
            assert!(html.contains("<title>Hello</title>"));
            assert!(html.contains("href=\"style.css\""));
            assert!(html.contains("<p>World</p>"));
            assert!(html.ends_with("</html>\n"));
        }
    }

    #[test]
    fn test_explicit_title_wins() {
        for backend in backends() {
            let html = render(
                backend.as_ref(),
                "# Sniffed\n",
                RawOptions {
                    page: true,
                    title: Some("Given".into()),
                    ..RawOptions::default()
                },
            );
            assert!(html.contains("<title>Given</title>"));
        }
    }

    #[test]
    fn test_toc_links_match_heading_ids() {
        for backend in backends() {
            let html = render(
                backend.as_ref(),
                "# Intro\n\ntext\n\n## Usage\n\n## Usage\n",
                RawOptions {
                    toc: true,
                    ..RawOptions::default()
                },
            );
            assert!(html.starts_with("<nav id=\"TOC\">"), "{html}");
            let (nav, body) = html.split_at(html.find("</nav>").unwrap());
            for id in ["intro", "usage", "usage-1"] {
                assert!(nav.contains(&format!("href=\"#{id}\"")), "{id}: {html}");
                assert!(!body.contains(&format!("href=\"#{id}\"")), "{id}: {html}");
            }
            assert!(body.contains("<h1 id=\"intro\">Intro</h1>"), "{html}");
            assert!(body.contains("<h2 id=\"usage\">Usage</h2>"), "{html}");
            assert!(body.contains("<h2 id=\"usage-1\">Usage</h2>"), "{html}");
            assert!(!body.contains("class="), "{html}");
        }
    }

    #[test]
    fn test_toc_only_omits_content() {
        for backend in backends() {
            let html = render(
                backend.as_ref(),
                "# Intro\n\nbody text\n",
                RawOptions {
                    toc_only: true,
                    ..RawOptions::default()
                },
            );
            assert!(html.contains("href=\"#intro\""));
            assert!(!html.contains("body text"));
        }
    }

    #[test]
    fn test_smartypants_flags() {
        for backend in backends() {
            let html = render(
                backend.as_ref(),
                "\"quoted\" 1/2 a--b\n",
                RawOptions::default(),
            );
            assert!(html.contains('\u{201c}'), "{html}");
            assert!(html.contains('\u{bd}'), "{html}");
            assert!(html.contains("a\u{2013}b"), "{html}");

            let html = render(
                backend.as_ref(),
                "a--b 1/2\n",
                RawOptions {
                    latexdashes: false,
                    fractions: false,
                    ..RawOptions::default()
                },
            );
            assert!(html.contains("a\u{2014}b"), "{html}");
            assert!(html.contains("1/2"), "{html}");

            let html = render(
                backend.as_ref(),
                "\"plain\" 1/2 a--b\n",
                RawOptions {
                    smartypants: false,
                    ..RawOptions::default()
                },
            );
            assert!(html.contains("1/2 a--b"), "{html}");
            assert!(!html.contains('\u{201c}'), "{html}");
        }
    }

    #[test]
    fn test_code_is_not_refined() {
        for backend in backends() {
            let html = render(
                backend.as_ref(),
                "`1/2 a--b`\n\n```\nx = 1/2 -- y\n```\n",
                RawOptions::default(),
            );
            assert!(html.contains("<code>1/2 a--b</code>"), "{html}");
            assert!(html.contains("x = 1/2 -- y"), "{html}");
        }
    }

    #[test]
    fn test_simple_output_strips_attributes() {
        for backend in backends() {
            let input = "# Title\n\n```rust\nfn main() {}\n```\n\n<div class=\"x\">raw</div>\n";
            let simple = render(backend.as_ref(), input, RawOptions::default());
            assert!(!simple.contains("id=\""), "{simple}");
            assert!(!simple.contains("language-rust"), "{simple}");
            assert!(!simple.contains("<div class=\"x\">"), "{simple}");

            let rich = render(
                backend.as_ref(),
                input,
                RawOptions {
                    html_simple: false,
                    ..RawOptions::default()
                },
            );
            assert!(rich.contains("id=\"title\""), "{rich}");
            assert!(rich.contains("language-rust"), "{rich}");
            assert!(rich.contains("<div class=\"x\">raw</div>"), "{rich}");
        }
    }

    #[test]
    fn test_rendering_is_deterministic() {
        let input = "# A\n\n## B\n\n\"text\" -- 3/4\n\n| a | b |\n|---|---|\n| 1 | 2 |\n";
        let config = normalize(&RawOptions {
            toc: true,
            page: true,
            ..RawOptions::default()
        });
        for backend in backends() {
            let first = backend.render(input.as_bytes(), &config).unwrap();
            let second = backend.render(input.as_bytes(), &config).unwrap();
            assert_eq!(first, second);
        }
    }

    #[test]
    fn test_concurrent_renders_share_a_backend() {
        for backend in backends() {
            let backend: std::sync::Arc<dyn Backend> = std::sync::Arc::from(backend);
            let handles: Vec<_> = (0..4)
                .map(|i| {
                    let backend = std::sync::Arc::clone(&backend);
                    std::thread::spawn(move || {
                        let input = format!("# Doc {i}\n\nbody\n");
                        backend
                            .render(input.as_bytes(), &EffectiveConfig::default())
                            .unwrap()
                    })
                })
                .collect();
            for (i, handle) in handles.into_iter().enumerate() {
                let html = String::from_utf8(handle.join().unwrap()).unwrap();
                assert!(html.contains(&format!("<h1>Doc {i}</h1>")), "{html}");
            }
        }
    }
}
