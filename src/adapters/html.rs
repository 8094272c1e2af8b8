use crate::domain::model::PatchArchive;

pub const DEFAULT_PAGE_SIZE: usize = 10;

#[derive(Debug, Clone, PartialEq)]
pub struct RenderedPage {
    pub file_name: String,
    pub html: String,
}

/// `<id>.html` for the first page, `<id>_<page>.html` afterwards.
pub fn page_file_name(id: usize, page: usize) -> String {
    if page == 1 {
        format!("{}.html", id)
    } else {
        format!("{}_{}.html", id, page)
    }
}

pub fn page_count(total: usize, page_size: usize) -> usize {
    total.div_ceil(page_size.max(1)).max(1)
}

pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn pagination(id: usize, page: usize, pages: usize) -> String {
    let mut nav = String::new();
    if page > 1 {
        nav.push_str(&format!("<a href='{}'>&lt;&lt;Prev</a>", page_file_name(id, page - 1)));
    }
    for i in 1..=pages {
        if i == page {
            nav.push_str(&format!("<span>[{}]</span>", i));
        } else {
            nav.push_str(&format!("<a href='{}'>{}</a>", page_file_name(id, i), i));
        }
    }
    if page < pages {
        nav.push_str(&format!("<a href='{}'>Next&gt;&gt;</a>", page_file_name(id, page + 1)));
    }
    nav
}

fn render_page(title: &str, nav: &str, patches: &[String]) -> String {
    let content = patches
        .iter()
        .map(|p| format!("<pre>{}</pre>", escape_html(p)))
        .collect::<Vec<_>>()
        .join("<hr>");
    let title = escape_html(title);

    format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <style>
    .pagination {{
        border-top: 1px solid #ddd;
        border-bottom: 1px solid #ddd;
        overflow-wrap: break-word;
    }}
    .pagination a, .pagination span {{
        margin: 0 4px;
    }}
    </style>
</head>
<body>
    <h1>{title}</h1>
    <div class="pagination">
        {nav}
    </div>
    <hr>
    {content}
    <div class="pagination">
        {nav}
    </div>
</body>
</html>
"#
    )
}

/// Splits an archive into pages of `page_size` patches.
pub fn render_archive(archive: &PatchArchive, page_size: usize) -> Vec<RenderedPage> {
    let page_size = page_size.max(1);
    let pages = page_count(archive.patches.len(), page_size);

    (1..=pages)
        .map(|page| {
            let start = ((page - 1) * page_size).min(archive.patches.len());
            let end = (page * page_size).min(archive.patches.len());
            RenderedPage {
                file_name: page_file_name(archive.id, page),
                html: render_page(
                    &archive.title,
                    &pagination(archive.id, page, pages),
                    &archive.patches[start..end],
                ),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn archive(patches: usize) -> PatchArchive {
        PatchArchive {
            id: 7,
            title: "Patches contributed by Foo Univ".to_string(),
            patches: (0..patches).map(|i| format!("diff #{}", i)).collect(),
        }
    }

    #[test]
    fn test_page_names_and_counts() {
        assert_eq!(page_file_name(3, 1), "3.html");
        assert_eq!(page_file_name(3, 2), "3_2.html");
        assert_eq!(page_count(0, 10), 1);
        assert_eq!(page_count(10, 10), 1);
        assert_eq!(page_count(11, 10), 2);
    }

    #[test]
    fn test_render_splits_patches_across_pages() {
        let pages = render_archive(&archive(23), DEFAULT_PAGE_SIZE);
        let names: Vec<_> = pages.iter().map(|p| p.file_name.as_str()).collect();
        assert_eq!(names, vec!["7.html", "7_2.html", "7_3.html"]);

        assert!(pages[0].html.contains("<pre>diff #0</pre>"));
        assert!(pages[0].html.contains("<pre>diff #9</pre>"));
        assert!(!pages[0].html.contains("diff #10<"));
        assert!(pages[2].html.contains("<pre>diff #22</pre>"));
        assert!(pages[0].html.contains("<h1>Patches contributed by Foo Univ</h1>"));
    }

    #[test]
    fn test_pagination_links() {
        let pages = render_archive(&archive(23), DEFAULT_PAGE_SIZE);

        let first = &pages[0].html;
        assert!(!first.contains("Prev"));
        assert!(first.contains("<span>[1]</span>"));
        assert!(first.contains("<a href='7_2.html'>2</a>"));
        assert!(first.contains("<a href='7_2.html'>Next&gt;&gt;</a>"));

        let middle = &pages[1].html;
        assert!(middle.contains("<a href='7.html'>&lt;&lt;Prev</a>"));
        assert!(middle.contains("<span>[2]</span>"));

        assert!(!pages[2].html.contains("Next"));
    }

    #[test]
    fn test_patch_text_is_escaped() {
        let archive = PatchArchive {
            id: 1,
            title: "Patches contributed by A & B".to_string(),
            patches: vec!["-#include <linux/fs.h>\n+if (a && b > 0)".to_string()],
        };
        let pages = render_archive(&archive, 10);

        assert!(pages[0]
            .html
            .contains("<pre>-#include &lt;linux/fs.h&gt;\n+if (a &amp;&amp; b &gt; 0)</pre>"));
        assert!(pages[0].html.contains("<title>Patches contributed by A &amp; B</title>"));
    }
}
