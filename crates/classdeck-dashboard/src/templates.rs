//! HTML templates for the dashboard.
//!
//! Uses a simple template approach with Tailwind CSS and HTMX.

use classdeck_grid::{
    Align, CellContent, HeaderCell, PageState, PageToken, RenderedTable, SortDirection, SortSpec,
    TableBody,
};

/// Per-request page chrome: header title and sidebar state.
#[derive(Debug, Clone)]
pub struct Chrome {
    /// Platform name shown in the header.
    pub project: String,
    /// Path of the active sidebar entry.
    pub active: &'static str,
    /// Count shown next to the code review entry.
    pub pending_reviews: usize,
}

const SIDEBAR: &[(&str, &str, &str)] = &[
    ("/", "chart-pie", "Dashboard"),
    ("/courses", "book", "Courses"),
    ("/lessons", "list-ol", "Lessons"),
    ("/tasks", "tasks", "Tasks"),
    ("/users", "users", "Users"),
    ("/roles", "user-shield", "Roles"),
    ("/statistics", "chart-line", "Statistics"),
    ("/code-review", "code", "Code Review"),
    ("/settings", "cog", "Settings"),
];

/// Base HTML layout wrapper.
pub fn layout(chrome: &Chrome, title: &str, content: &str) -> String {
    format!(
        r##"<!DOCTYPE html>
<html lang="en" x-data="{{
    darkMode: localStorage.getItem('darkMode') === 'true',
    sidebarOpen: true
}}" :class="{{ 'dark': darkMode }}">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title} - {project}</title>
    <script src="https://cdn.tailwindcss.com"></script>
    <script>
        tailwind.config = {{
            darkMode: 'class',
            theme: {{
                extend: {{
                    colors: {{
                        primary: {{
                            50: '#eff6ff',
                            100: '#dbeafe',
                            500: '#3b82f6',
                            600: '#2563eb',
                            700: '#1d4ed8',
                            900: '#1e3a8a',
                        }}
                    }}
                }}
            }}
        }}
    </script>
    <script src="https://unpkg.com/htmx.org@1.9.10"></script>
    <script defer src="https://unpkg.com/alpinejs@3.x.x/dist/cdn.min.js"></script>
    <script src="https://cdn.jsdelivr.net/npm/chart.js@4.4.1/dist/chart.umd.min.js"></script>
    <link rel="stylesheet" href="https://cdnjs.cloudflare.com/ajax/libs/font-awesome/6.5.1/css/all.min.css">
    <link rel="stylesheet" href="/assets/app.css">
</head>
<body class="bg-gray-50 dark:bg-gray-900 min-h-screen">
    {NAV}

    <div class="flex">
        {SIDEBAR}

        <main class="flex-1 p-6 lg:p-8">
            <div class="max-w-7xl mx-auto">
                {content}
            </div>
        </main>
    </div>

    <div id="toast-stack" class="fixed bottom-4 right-4 z-50 space-y-2 w-80"></div>

    <script src="/assets/app.js"></script>
</body>
</html>"##,
        title = escape_html(title),
        project = escape_html(&chrome.project),
        NAV = nav_template(&chrome.project),
        SIDEBAR = sidebar_template(chrome),
    )
}

fn nav_template(project: &str) -> String {
    format!(
        r##"<nav class="bg-primary-600 dark:bg-primary-900 text-white px-4 py-3 sticky top-0 z-40 shadow-lg">
        <div class="flex items-center justify-between">
            <div class="flex items-center gap-4">
                <button @click="sidebarOpen = !sidebarOpen" class="p-2 hover:bg-primary-700 rounded-lg lg:hidden">
                    <i class="fas fa-bars"></i>
                </button>
                <a href="/" class="flex items-center gap-2">
                    <i class="fas fa-graduation-cap text-xl"></i>
                    <span class="font-semibold">{project}</span>
                    <span class="text-sm bg-primary-500 dark:bg-primary-700 px-2 py-1 rounded">Admin</span>
                </a>
            </div>
            <button @click="darkMode = !darkMode; localStorage.setItem('darkMode', darkMode)"
                    class="p-2 hover:bg-primary-700 rounded-lg">
                <i class="fas" :class="darkMode ? 'fa-sun' : 'fa-moon'"></i>
            </button>
        </div>
    </nav>"##,
        project = escape_html(project),
    )
}

fn sidebar_template(chrome: &Chrome) -> String {
    let links: String = SIDEBAR
        .iter()
        .map(|(href, icon, label)| {
            let active = if *href == chrome.active {
                "bg-primary-50 dark:bg-primary-900/50 text-primary-600 dark:text-primary-400"
            } else {
                "text-gray-700 dark:text-gray-200"
            };
            let counter = if *href == "/code-review" && chrome.pending_reviews > 0 {
                format!(
                    r#"<span class="ml-auto bg-yellow-500 text-white text-xs px-2 py-0.5 rounded-full">{}</span>"#,
                    chrome.pending_reviews
                )
            } else {
                String::new()
            };
            format!(
                r##"<a href="{href}" class="flex items-center gap-3 px-4 py-3 {active} hover:bg-primary-50 dark:hover:bg-primary-900/50 rounded-lg transition-colors">
                    <i class="fas fa-{icon} w-5"></i>
                    <span>{label}</span>
                    {counter}
                </a>"##
            )
        })
        .collect();

    format!(
        r##"<aside class="w-64 bg-white dark:bg-gray-800 border-r border-gray-200 dark:border-gray-700 min-h-[calc(100vh-56px)] transition-all duration-300"
              :class="{{ '-ml-64': !sidebarOpen }}"
              x-cloak>
            <nav class="p-4 space-y-1">
                {links}
            </nav>
        </aside>"##
    )
}

/// Page heading with an optional right-hand action.
pub fn page_header(title: &str, subtitle: &str, action: &str) -> String {
    format!(
        r##"<div class="flex items-center justify-between mb-6">
            <div>
                <h1 class="text-3xl font-bold text-gray-900 dark:text-white">{title}</h1>
                <p class="mt-1 text-gray-600 dark:text-gray-400">{subtitle}</p>
            </div>
            {action}
        </div>"##,
        title = escape_html(title),
        subtitle = escape_html(subtitle),
    )
}

/// Card component.
pub fn card(title: &str, content: &str) -> String {
    format!(
        r##"<div class="bg-white dark:bg-gray-800 rounded-xl shadow-sm border border-gray-200 dark:border-gray-700 overflow-hidden">
            <div class="px-6 py-4 border-b border-gray-200 dark:border-gray-700">
                <h3 class="text-lg font-semibold text-gray-900 dark:text-white">{title}</h3>
            </div>
            <div class="p-6">
                {content}
            </div>
        </div>"##
    )
}

/// Stats card component.
pub fn stats_card(title: &str, value: &str, icon: &str, color: &str) -> String {
    format!(
        r##"<div class="bg-white dark:bg-gray-800 rounded-xl shadow-sm border border-gray-200 dark:border-gray-700 p-6">
            <div class="flex items-center justify-between">
                <div>
                    <p class="text-sm text-gray-500 dark:text-gray-400">{title}</p>
                    <p class="text-2xl font-bold text-gray-900 dark:text-white mt-1">{value}</p>
                </div>
                <div class="w-12 h-12 rounded-full bg-{color}-100 dark:bg-{color}-900/30 flex items-center justify-center">
                    <i class="fas fa-{icon} text-{color}-500 text-xl"></i>
                </div>
            </div>
        </div>"##
    )
}

/// Button component.
pub fn button(text: &str, variant: &str, attrs: &str) -> String {
    let (bg, hover, text_color) = match variant {
        "primary" => ("bg-primary-600", "hover:bg-primary-700", "text-white"),
        "secondary" => (
            "bg-gray-200 dark:bg-gray-700",
            "hover:bg-gray-300 dark:hover:bg-gray-600",
            "text-gray-700 dark:text-gray-200",
        ),
        "danger" => ("bg-red-600", "hover:bg-red-700", "text-white"),
        "success" => ("bg-green-600", "hover:bg-green-700", "text-white"),
        _ => ("bg-gray-200", "hover:bg-gray-300", "text-gray-700"),
    };

    format!(
        r##"<button class="{bg} {hover} {text_color} px-4 py-2 rounded-lg font-medium transition-colors disabled:opacity-50" {attrs}>{text}</button>"##
    )
}

/// Input field component.
pub fn input(name: &str, label: &str, input_type: &str, value: &str, placeholder: &str) -> String {
    format!(
        r##"<div class="space-y-1">
            <label for="{name}" class="block text-sm font-medium text-gray-700 dark:text-gray-300">{label}</label>
            <input type="{input_type}" name="{name}" id="{name}" value="{value}" placeholder="{placeholder}"
                   class="w-full px-4 py-2 border border-gray-300 dark:border-gray-600 rounded-lg bg-white dark:bg-gray-800 text-gray-900 dark:text-white focus:ring-2 focus:ring-primary-500 focus:border-primary-500">
        </div>"##,
        value = escape_html(value),
    )
}

/// Select field component. Options are `(value, text, selected)`.
pub fn select(name: &str, label: &str, options: &[(String, String, bool)]) -> String {
    let options_html: String = options
        .iter()
        .map(|(value, text, selected)| {
            let value = escape_html(value);
            let text = escape_html(text);
            if *selected {
                format!(r#"<option value="{value}" selected>{text}</option>"#)
            } else {
                format!(r#"<option value="{value}">{text}</option>"#)
            }
        })
        .collect();

    format!(
        r##"<div class="space-y-1">
            <label for="{name}" class="block text-sm font-medium text-gray-700 dark:text-gray-300">{label}</label>
            <select name="{name}" id="{name}"
                    class="w-full px-4 py-2 border border-gray-300 dark:border-gray-600 rounded-lg bg-white dark:bg-gray-800 text-gray-900 dark:text-white focus:ring-2 focus:ring-primary-500 focus:border-primary-500">
                {options_html}
            </select>
        </div>"##
    )
}

/// Badge component.
pub fn badge(text: &str, color: &str) -> String {
    format!(
        r##"<span class="inline-flex items-center px-2.5 py-0.5 rounded-full text-xs font-medium bg-{color}-100 dark:bg-{color}-900/30 text-{color}-800 dark:text-{color}-300">{text}</span>"##,
        text = escape_html(text),
    )
}

/// Badge colored by a status label.
pub fn status_badge(status: &str) -> String {
    let color = match status {
        "active" | "approved" | "configured" => "green",
        "draft" | "pending" | "not-configured" => "yellow",
        "banned" | "error" | "changes-requested" => "red",
        _ => "gray",
    };
    badge(status, color)
}

/// Badge colored by a user role.
pub fn role_badge(role: &str) -> String {
    let color = match role {
        "admin" | "moderator" => "blue",
        "teacher" => "green",
        _ => "gray",
    };
    badge(role, color)
}

/// Empty state component.
pub fn empty_state(icon: &str, title: &str, description: &str, action: Option<(&str, &str)>) -> String {
    let action_html = action.map_or(String::new(), |(text, href)| {
        format!(
            r##"<a href="{href}" class="mt-4 inline-flex items-center gap-2 bg-primary-600 hover:bg-primary-700 text-white px-4 py-2 rounded-lg font-medium transition-colors">
            <i class="fas fa-arrow-left"></i> {text}
        </a>"##
        )
    });

    format!(
        r##"<div class="text-center py-12">
            <i class="fas fa-{icon} text-4xl text-gray-400 dark:text-gray-600 mb-4"></i>
            <h3 class="text-lg font-medium text-gray-900 dark:text-white">{title}</h3>
            <p class="mt-1 text-gray-500 dark:text-gray-400">{description}</p>
            {action_html}
        </div>"##,
        description = escape_html(description),
    )
}

/// Code block component.
pub fn code_block(code: &str, language: &str) -> String {
    format!(
        r##"<pre class="bg-gray-900 text-gray-100 p-4 rounded-lg overflow-x-auto text-sm"><code class="language-{language}">{code}</code></pre>"##,
        code = escape_html(code),
    )
}

/// Canvas hydrated by `app.js` with series fetched from `source`.
pub fn chart(id: &str, kind: &str, source: &str) -> String {
    format!(
        r##"<div class="h-72"><canvas id="{id}" data-chart="{kind}" data-source="{source}"></canvas></div>"##
    )
}

/// Escape text for HTML content and attribute values.
pub fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// `path?k=v&...` with percent-encoded values. Empty values are skipped.
pub fn href(path: &str, params: &[(&str, &str)]) -> String {
    let query: Vec<String> = params
        .iter()
        .filter(|(_, value)| !value.is_empty())
        .map(|(key, value)| format!("{key}={}", urlencoding::encode(value)))
        .collect();
    if query.is_empty() {
        path.to_string()
    } else {
        format!("{path}?{}", query.join("&"))
    }
}

/// Where table headers and pager buttons point.
///
/// `params` are the screen's filters; sort and page are appended per link.
#[derive(Debug, Clone)]
pub struct ListLinks<'a> {
    pub path: &'a str,
    pub params: Vec<(&'a str, String)>,
    pub sort: Option<SortSpec>,
}

impl ListLinks<'_> {
    fn link(&self, sort: Option<(&str, SortDirection)>, page: usize) -> String {
        let page = page.to_string();
        let mut params: Vec<(&str, &str)> =
            self.params.iter().map(|(k, v)| (*k, v.as_str())).collect();
        let sort = sort.or_else(|| self.sort.as_ref().map(|s| (s.key.as_str(), s.direction)));
        if let Some((key, direction)) = sort {
            params.push(("sort", key));
            params.push(("dir", direction.as_str()));
        }
        params.push(("page", &page));
        href(self.path, &params)
    }

    /// Link for one page, keeping filters and sort.
    pub fn page(&self, page: usize) -> String {
        self.link(None, page)
    }

    /// Link that sorts by `key`, flipping the direction if it is already the
    /// active sort. Sorting resets to the first page.
    pub fn sort_by(&self, key: &str) -> String {
        let direction = match &self.sort {
            Some(current) if current.key == key => current.direction.toggled(),
            _ => SortDirection::Asc,
        };
        self.link(Some((key, direction)), 1)
    }
}

fn align_class(align: Align) -> &'static str {
    match align {
        Align::Left => "text-left",
        Align::Center => "text-center",
        Align::Right => "text-right",
    }
}

fn header_html(header: &HeaderCell, links: &ListLinks<'_>) -> String {
    let width = header
        .width
        .as_deref()
        .map(|w| format!(r#" style="width: {}""#, escape_html(w)))
        .unwrap_or_default();
    let label = escape_html(&header.label);
    let align = align_class(header.align);

    if !header.sortable {
        return format!(
            r#"<th class="px-6 py-3 {align} text-xs font-medium text-gray-500 dark:text-gray-400 uppercase tracking-wider"{width}>{label}</th>"#
        );
    }

    let icon = match &links.sort {
        Some(s) if s.key == header.key && s.direction == SortDirection::Asc => "fa-sort-up",
        Some(s) if s.key == header.key => "fa-sort-down",
        _ => "fa-sort opacity-30",
    };
    format!(
        r##"<th class="px-6 py-3 {align} text-xs font-medium text-gray-500 dark:text-gray-400 uppercase tracking-wider"{width}>
            <a href="{link}" class="hover:text-gray-700 dark:hover:text-gray-200">{label}<i class="fas {icon} ml-1"></i></a>
        </th>"##,
        link = escape_html(&links.sort_by(&header.key)),
    )
}

/// Render a table produced by a column-driven definition.
pub fn data_table(table: &RenderedTable, links: &ListLinks<'_>) -> String {
    let headers_html: String = table.headers.iter().map(|h| header_html(h, links)).collect();

    let rows_html: String = match &table.body {
        TableBody::Placeholder { message, colspan } => format!(
            r#"<tr><td colspan="{colspan}" class="px-6 py-12 text-center text-gray-500 dark:text-gray-400">{}</td></tr>"#,
            escape_html(message)
        ),
        TableBody::Rows { rows } => rows
            .iter()
            .map(|row| {
                let cells: String = row
                    .cells
                    .iter()
                    .map(|cell| {
                        let content = match &cell.content {
                            CellContent::Text(text) => escape_html(text),
                            CellContent::Markup(html) => html.clone(),
                        };
                        format!(
                            r#"<td class="px-6 py-4 whitespace-nowrap text-sm {} text-gray-900 dark:text-gray-100">{content}</td>"#,
                            align_class(cell.align)
                        )
                    })
                    .collect();
                let key = escape_html(&row.key.to_string());
                match &row.link {
                    Some(link) => format!(
                        r#"<tr data-row-key="{key}" data-href="{}" class="cursor-pointer hover:bg-gray-50 dark:hover:bg-gray-700/50">{cells}</tr>"#,
                        escape_html(link)
                    ),
                    None => format!(
                        r#"<tr data-row-key="{key}" class="hover:bg-gray-50 dark:hover:bg-gray-700/50">{cells}</tr>"#
                    ),
                }
            })
            .collect(),
    };

    format!(
        r##"<div class="overflow-x-auto">
            <table class="min-w-full divide-y divide-gray-200 dark:divide-gray-700">
                <thead class="bg-gray-50 dark:bg-gray-800">
                    <tr>{headers_html}</tr>
                </thead>
                <tbody class="bg-white dark:bg-gray-900 divide-y divide-gray-200 dark:divide-gray-700">
                    {rows_html}
                </tbody>
            </table>
        </div>"##
    )
}

/// Pager with "Showing X to Y of Z", previous/next and the page window.
/// Renders nothing for a single page.
pub fn pager(state: &PageState, links: &ListLinks<'_>) -> String {
    if state.total_pages <= 1 {
        return String::new();
    }

    const LINK: &str = "px-3 py-1.5 rounded border border-gray-300 dark:border-gray-600 text-sm text-gray-700 dark:text-gray-300 hover:bg-gray-50 dark:hover:bg-gray-700";
    const DISABLED: &str = "px-3 py-1.5 rounded border border-gray-200 dark:border-gray-700 text-sm text-gray-400 dark:text-gray-600 cursor-not-allowed";
    const CURRENT: &str = "px-3 py-1.5 rounded text-sm text-white bg-primary-600";

    let showing = state
        .showing()
        .map(|(first, last)| format!("Showing {first} to {last} of {} results", state.total_items))
        .unwrap_or_default();

    let step = |enabled: bool, page: usize, label: &str| {
        if enabled {
            format!(
                r#"<a href="{}" class="{LINK}">{label}</a>"#,
                escape_html(&links.page(page))
            )
        } else {
            format!(r#"<span class="{DISABLED}">{label}</span>"#)
        }
    };

    let window: String = state
        .window()
        .into_iter()
        .map(|token| match token {
            PageToken::Page(page) if page == state.current_page => {
                format!(r#"<span class="{CURRENT}" aria-current="page">{page}</span>"#)
            }
            PageToken::Page(page) => format!(
                r#"<a href="{}" class="{LINK}">{page}</a>"#,
                escape_html(&links.page(page))
            ),
            PageToken::Ellipsis => {
                r#"<span class="px-2 text-gray-500 dark:text-gray-400">...</span>"#.to_string()
            }
        })
        .collect();

    format!(
        r##"<div class="flex items-center justify-between px-6 py-4">
            <div class="text-sm text-gray-500 dark:text-gray-400">{showing}</div>
            <div class="flex items-center gap-2">
                {prev}
                {window}
                {next}
            </div>
        </div>"##,
        prev = step(state.has_previous(), state.current_page.saturating_sub(1), "Previous"),
        next = step(state.has_next(), state.current_page + 1, "Next"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use classdeck_grid::{Column, Table};
    use serde::Serialize;

    #[derive(Serialize)]
    struct Row {
        id: u32,
        name: String,
    }

    fn links(sort: Option<SortSpec>) -> ListLinks<'static> {
        ListLinks {
            path: "/courses",
            params: vec![("q", "html & css".to_string()), ("status", String::new())],
            sort,
        }
    }

    #[test]
    fn href_encodes_and_skips_empty_values() {
        assert_eq!(
            href("/courses", &[("q", "a b"), ("status", ""), ("page", "2")]),
            "/courses?q=a%20b&page=2"
        );
        assert_eq!(href("/users", &[]), "/users");
    }

    #[test]
    fn sort_link_toggles_active_column() {
        let l = links(Some(SortSpec::new("students_count", SortDirection::Asc)));
        assert_eq!(
            l.sort_by("students_count"),
            "/courses?q=html%20%26%20css&sort=students_count&dir=desc&page=1"
        );
        assert_eq!(
            l.sort_by("created_at"),
            "/courses?q=html%20%26%20css&sort=created_at&dir=asc&page=1"
        );
        assert_eq!(
            l.page(3),
            "/courses?q=html%20%26%20css&sort=students_count&dir=asc&page=3"
        );
    }

    #[test]
    fn empty_table_renders_one_spanning_row() {
        let table = Table::new(vec![
            Column::<Row>::field("id", "ID"),
            Column::field("name", "Name").sortable(),
        ])
        .unwrap()
        .empty_message("No courses found");
        let html = data_table(&table.render(&[]), &links(None));
        assert!(html.contains(r#"colspan="2""#));
        assert!(html.contains("No courses found"));
        assert_eq!(html.matches("<tr").count(), 2);
    }

    #[test]
    fn text_cells_are_escaped_and_rows_link() {
        let table = Table::new(vec![Column::<Row>::field("name", "Name")])
            .unwrap()
            .row_id(|r| r.id.to_string())
            .on_row_click(|r| format!("/lessons?course={}", r.id));
        let rows = [Row {
            id: 7,
            name: "<b>bold</b>".to_string(),
        }];
        let html = data_table(&table.render(&rows), &links(None));
        assert!(html.contains("&lt;b&gt;bold&lt;/b&gt;"));
        assert!(html.contains(r#"data-href="/lessons?course=7""#));
        assert!(html.contains(r#"data-row-key="7""#));
    }

    #[test]
    fn pager_hides_for_single_page_and_shows_window() {
        assert_eq!(pager(&PageState::new(1, 10, 9), &links(None)), "");

        let html = pager(&PageState::new(6, 10, 100), &links(None));
        assert!(html.contains("Showing 51 to 60 of 100 results"));
        assert!(html.contains(r#"aria-current="page">6<"#));
        assert_eq!(html.matches("...").count(), 2);
        assert!(html.contains("page=10"));
    }
}
