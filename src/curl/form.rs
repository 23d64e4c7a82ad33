//! `-F`/`--form` parts

use super::args::{FormType, SrcFormParam};
use crate::errors::{CurlconvError, Result};
use crate::word::Word;

/// Where a multipart part gets its content from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormContent {
    Text { content: Word },
    File { content_file: Word },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormParam {
    pub name: Word,
    pub content: FormContent,
    /// Sent with the part. `name=@file` sets it, `name=<file` doesn't.
    pub filename: Option<Word>,
    pub content_type: Option<Word>,
    /// Extra part headers, only found in raw multipart bodies
    pub headers: Vec<Word>,
}

impl FormParam {
    pub fn text(name: Word, content: Word) -> Self {
        FormParam {
            name,
            content: FormContent::Text { content },
            filename: None,
            content_type: None,
            headers: Vec::new(),
        }
    }

    pub fn file(name: Word, content_file: Word, filename: Option<Word>) -> Self {
        FormParam {
            name,
            content: FormContent::File { content_file },
            filename,
            content_type: None,
            headers: Vec::new(),
        }
    }

    pub fn reads_file(&self) -> bool {
        matches!(self.content, FormContent::File { .. })
    }
}

/// Split `;type=` and `;filename=` modifiers off a file part
fn split_modifiers(value: &Word) -> (Word, Option<Word>, Option<Word>) {
    let mut parts = value.split(";", None).into_iter();
    let file = parts.next().unwrap_or_default();
    let mut content_type = None;
    let mut filename = None;
    for part in parts {
        let part = part.trim_start();
        if part.starts_with("type=") {
            content_type = Some(part.slice(5..));
        } else if part.starts_with("filename=") {
            filename = Some(part.slice(9..).replace("\"", ""));
        }
    }
    (file, content_type, filename)
}

/// Parse `name=value`, `name=@file` and `name=<file` parts.
///
/// A part without `=` is an error, like curl's own "Illegally formatted input field".
pub fn parse_form(form: &[SrcFormParam]) -> Result<Vec<FormParam>> {
    let mut parts = Vec::with_capacity(form.len());
    for arg in form {
        let Some((name, value)) = arg.value.split_once("=") else {
            return Err(CurlconvError::parse(format!(
                "invalid value for --form/-F: {:?}",
                arg.value.to_string()
            )));
        };

        let interpret = arg.kind == FormType::Form;
        let first = value.char_at(0);
        let part = match first {
            Some(c) if interpret && c.is_char('@') => {
                let (file, content_type, filename) = split_modifiers(&value.slice(1..));
                let filename = filename.unwrap_or_else(|| file.clone());
                FormParam {
                    content_type,
                    ..FormParam::file(name, file, Some(filename))
                }
            }
            Some(c) if interpret && c.is_char('<') => {
                let (file, content_type, _) = split_modifiers(&value.slice(1..));
                FormParam {
                    content_type,
                    ..FormParam::file(name, file, None)
                }
            }
            _ => FormParam::text(name, value),
        };
        parts.push(part);
    }
    Ok(parts)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(kind: FormType, value: &str) -> SrcFormParam {
        SrcFormParam {
            value: Word::from(value),
            kind,
        }
    }

    #[test]
    fn test_text_part() {
        let parts = parse_form(&[form(FormType::Form, "name=value=with=equals")]).unwrap();
        assert_eq!(parts[0], FormParam::text(Word::from("name"), Word::from("value=with=equals")));
    }

    #[test]
    fn test_file_upload() {
        let parts = parse_form(&[form(FormType::Form, "upload=@photo.jpg")]).unwrap();
        assert_eq!(
            parts[0].content,
            FormContent::File {
                content_file: Word::from("photo.jpg")
            }
        );
        assert_eq!(parts[0].filename, Some(Word::from("photo.jpg")));
    }

    #[test]
    fn test_file_content() {
        let parts = parse_form(&[form(FormType::Form, "text=<notes.txt")]).unwrap();
        assert_eq!(
            parts[0].content,
            FormContent::File {
                content_file: Word::from("notes.txt")
            }
        );
        assert!(parts[0].filename.is_none());
    }

    #[test]
    fn test_modifiers() {
        let parts =
            parse_form(&[form(FormType::Form, "f=@a.bin;type=image/png;filename=b.png")]).unwrap();
        assert_eq!(parts[0].content_type, Some(Word::from("image/png")));
        assert_eq!(
            parts[0].content,
            FormContent::File {
                content_file: Word::from("a.bin")
            }
        );
        assert_eq!(parts[0].filename, Some(Word::from("b.png")));
    }

    #[test]
    fn test_form_string_is_literal() {
        let parts = parse_form(&[form(FormType::String, "a=@not-a-file")]).unwrap();
        assert!(!parts[0].reads_file());
    }

    #[test]
    fn test_missing_equals_is_fatal() {
        let err = parse_form(&[form(FormType::Form, "novalue")]).unwrap_err();
        assert!(err.to_string().contains("--form/-F"));
    }
}
