// src/cli/display.rs
use crate::domain::bookmark::Bookmark;
use crate::domain::entry::Entry;
use crate::domain::folder::Folder;
use crate::domain::path::Breadcrumb;
use std::io::{self, IsTerminal};
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

/// Stdout, colored only on a terminal and when not disabled.
pub fn stdout(no_color: bool) -> StandardStream {
    let color_choice = if !no_color && io::stdout().is_terminal() {
        ColorChoice::Auto
    } else {
        ColorChoice::Never
    };
    StandardStream::stdout(color_choice)
}

fn colored<W: WriteColor>(out: &mut W, color: Color, text: &str) -> io::Result<()> {
    out.set_color(ColorSpec::new().set_fg(Some(color)))?;
    write!(out, "{}", text)?;
    out.reset()
}

/// One line per entry: folders as `title/`, bookmarks with their URL.
pub fn show_entries<W: WriteColor>(out: &mut W, entries: &[Entry]) -> io::Result<()> {
    let id_width = entries
        .iter()
        .map(|e| e.id().to_string().len())
        .max()
        .unwrap_or(1);

    for entry in entries {
        write!(out, "{:>id_width$}  ", entry.id())?;
        match entry {
            Entry::Folder(folder) => {
                colored(out, Color::Blue, &format!("{}/", folder.title))?;
            }
            Entry::Bookmark(bookmark) => {
                colored(out, Color::Green, &bookmark.title)?;
                write!(out, "  ")?;
                colored(out, Color::Yellow, &bookmark.url)?;
            }
        }
        writeln!(out)?;
    }
    Ok(())
}

pub fn show_breadcrumbs<W: WriteColor>(out: &mut W, crumbs: &[Breadcrumb]) -> io::Result<()> {
    let line: String = crumbs.iter().map(|c| c.title.as_str()).collect();
    colored(out, Color::Magenta, &line)?;
    writeln!(out)
}

pub fn show_folder<W: WriteColor>(out: &mut W, folder: &Folder) -> io::Result<()> {
    colored(out, Color::Blue, &folder.to_string())?;
    writeln!(out, " [{}]", folder.id)?;
    match folder.parent_id {
        Some(parent_id) => writeln!(out, "  parent: {}", parent_id),
        None => writeln!(out, "  parent: -"),
    }
}

pub fn show_bookmark<W: WriteColor>(out: &mut W, bookmark: &Bookmark) -> io::Result<()> {
    colored(out, Color::Green, &bookmark.title)?;
    writeln!(out, " [{}]", bookmark.id)?;
    write!(out, "  ")?;
    colored(out, Color::Yellow, &bookmark.url)?;
    writeln!(out)?;
    writeln!(out, "  folder: {}", bookmark.folder_id)?;
    if !bookmark.comment.is_empty() {
        writeln!(out, "  comment: {}", bookmark.comment)?;
    }
    let favicon = if bookmark.has_favicon() { "yes" } else { "no" };
    writeln!(out, "  favicon: {}", favicon)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::bookmark::BookmarkBuilder;
    use crate::domain::path::breadcrumbs;
    use termcolor::Buffer;

    fn bookmark() -> Bookmark {
        BookmarkBuilder::default()
            .id(12)
            .folder_id(3)
            .title("Rust")
            .url("https://www.rust-lang.org")
            .comment("home")
            .build()
            .unwrap()
    }

    fn text(buffer: Buffer) -> String {
        String::from_utf8(buffer.into_inner()).unwrap()
    }

    #[test]
    fn given_entries_when_shown_then_one_aligned_line_each() -> io::Result<()> {
        let entries = vec![
            Entry::Folder(Folder::new(3, Some(0), "dev")),
            Entry::Bookmark(bookmark()),
        ];
        let mut buffer = Buffer::no_color();

        show_entries(&mut buffer, &entries)?;

        assert_eq!(
            text(buffer),
            " 3  dev/\n12  Rust  https://www.rust-lang.org\n"
        );
        Ok(())
    }

    #[test]
    fn given_no_entries_when_shown_then_nothing() -> io::Result<()> {
        let mut buffer = Buffer::no_color();
        show_entries(&mut buffer, &[])?;
        assert!(text(buffer).is_empty());
        Ok(())
    }

    #[test]
    fn given_bookmark_when_shown_then_details_listed() -> io::Result<()> {
        let mut buffer = Buffer::no_color();
        show_bookmark(&mut buffer, &bookmark())?;

        let out = text(buffer);
        assert!(out.starts_with("Rust [12]\n"));
        assert!(out.contains("comment: home"));
        assert!(out.contains("favicon: no"));
        Ok(())
    }

    #[test]
    fn given_root_when_shown_then_slash_without_parent() -> io::Result<()> {
        let mut buffer = Buffer::no_color();
        show_folder(&mut buffer, &Folder::root())?;
        assert_eq!(text(buffer), "/ [0]\n  parent: -\n");
        Ok(())
    }

    #[test]
    fn given_crumbs_when_shown_then_joined() -> io::Result<()> {
        let mut buffer = Buffer::no_color();
        show_breadcrumbs(&mut buffer, &breadcrumbs("/a/b"))?;
        assert_eq!(text(buffer), "/a/b/\n");
        Ok(())
    }
}
