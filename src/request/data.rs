//! Request body and query string assembly from `--data*`/`--url-query` values

use super::{DataParam, FileDataParam};
use crate::curl::args::{DataType, GlobalConfig, SrcDataParam};
use crate::query::percent_encode_plus;
use crate::word::{self, Word};

/// The assembled pieces, the text they join into, and the first file read
pub type BuiltData = (Vec<DataParam>, Word, Option<String>);

/// Concatenate data arguments the way curl does, with `&` between them.
///
/// Literal pieces are merged, `@file` pieces become [`FileDataParam`]s.
/// `@-` is replaced by `stdin` when its content is known.
pub fn build_data(params: &[SrcDataParam], stdin: Option<&Word>, stdin_file: Option<&Word>) -> BuiltData {
    let mut data: Vec<DataParam> = Vec::new();
    let mut pending = Word::new();

    for (i, param) in params.iter().enumerate() {
        let kind = param.kind;
        let mut value = param.value.clone();
        let mut name: Option<Word> = None;

        if i > 0 && kind != DataType::Json {
            pending = pending.append("&");
        }

        if kind == DataType::Urlencode {
            // curl looks for `=` before `@`
            let split_on = if value.contains("=") || !value.contains("@") { "=" } else { "@" };
            if let Some((n, v)) = value.split_once(split_on) {
                name = Some(n);
                value = v;
            }
            if split_on == "=" {
                if let Some(n) = name.filter(|n| n.to_bool()) {
                    pending = pending.concat(&n).append("=");
                }
                pending = pending.concat(&percent_encode_plus(&value));
                continue;
            }
            name = name.filter(|n| n.to_bool());
            value = value.prepend("@");
        }

        let mut filename: Option<Word> = None;
        if kind != DataType::Raw && value.starts_with("@") {
            let file = value.slice(1..);
            if file.eq_str("-") {
                match (stdin, stdin_file) {
                    (Some(stdin), _) => {
                        value = match kind {
                            DataType::Binary | DataType::Json => stdin.clone(),
                            DataType::Urlencode => {
                                let prefix = name.as_ref().map(|n| n.append("=")).unwrap_or_default();
                                prefix.concat(&percent_encode_plus(stdin))
                            }
                            _ => stdin.replace("\n", "").replace("\r", ""),
                        };
                    }
                    (None, Some(stdin_file)) => filename = Some(stdin_file.clone()),
                    (None, None) => filename = Some(file),
                }
            } else {
                filename = Some(file);
            }
        }

        match filename {
            Some(filename) => {
                if pending.to_bool() {
                    data.push(DataParam::Text(std::mem::take(&mut pending)));
                }
                data.push(DataParam::File(FileDataParam {
                    filetype: kind,
                    name,
                    filename,
                }));
            }
            None => pending = pending.concat(&value),
        }
    }
    if pending.to_bool() {
        data.push(DataParam::Text(pending));
    }

    let mut reads_file = None;
    let pieces: Vec<Word> = data
        .iter()
        .map(|d| match d {
            DataParam::Text(w) => w.clone(),
            DataParam::File(f) => {
                reads_file.get_or_insert_with(|| f.filename.to_string());
                match &f.name {
                    Some(name) => name.append("=@").concat(&f.filename),
                    None => f.filename.prepend("@"),
                }
            }
        })
        .collect();

    (data, word::join(&pieces, ""), reads_file)
}

/// `@-`, or `name@-` for `--data-urlencode`, the same shapes [`build_data`] reads stdin for
fn reads_stdin_param(param: &SrcDataParam) -> bool {
    match param.kind {
        DataType::Raw => false,
        DataType::Urlencode => {
            !param.value.contains("=")
                && param
                    .value
                    .split_once("@")
                    .is_some_and(|(_, file)| file.eq_str("-"))
        }
        _ => param.value.eq_str("@-"),
    }
}

/// Whether any operation needs the content of standard input
pub fn reads_stdin(global: &GlobalConfig) -> bool {
    global.configs.iter().any(|config| {
        let data_reads = config
            .data
            .iter()
            .chain(config.url_query.iter())
            .any(reads_stdin_param);
        let uploads = config
            .list("upload-file")
            .iter()
            .any(|f| f.eq_str("-") || f.eq_str("."));
        data_reads || uploads
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn param(kind: DataType, value: &str) -> SrcDataParam {
        SrcDataParam::new(kind, Word::from(value))
    }

    fn text(params: &[SrcDataParam]) -> String {
        build_data(params, None, None).1.to_string()
    }

    #[test]
    fn test_joined_with_ampersand() {
        assert_eq!(text(&[param(DataType::Data, "a=1"), param(DataType::Raw, "b=2")]), "a=1&b=2");
    }

    #[test]
    fn test_urlencode_forms() {
        assert_eq!(text(&[param(DataType::Urlencode, "hello world")]), "hello+world");
        assert_eq!(text(&[param(DataType::Urlencode, "=a&b")]), "a%26b");
        assert_eq!(text(&[param(DataType::Urlencode, "q=a b")]), "q=a+b");
    }

    #[test]
    fn test_urlencode_file() {
        let (data, joined, reads) = build_data(&[param(DataType::Urlencode, "name@file.txt")], None, None);
        assert_eq!(
            data,
            vec![DataParam::File(FileDataParam {
                filetype: DataType::Urlencode,
                name: Some(Word::from("name")),
                filename: Word::from("file.txt"),
            })]
        );
        assert_eq!(joined.to_string(), "name=@file.txt");
        assert_eq!(reads.as_deref(), Some("file.txt"));
    }

    #[test]
    fn test_file_between_literals() {
        let (data, joined, reads) = build_data(
            &[
                param(DataType::Data, "a=1"),
                param(DataType::Binary, "@body.bin"),
                param(DataType::Data, "b=2"),
            ],
            None,
            None,
        );
        assert_eq!(data.len(), 3);
        assert_eq!(data[0], DataParam::Text(Word::from("a=1&")));
        assert_eq!(joined.to_string(), "a=1&@body.bin&b=2");
        assert_eq!(reads.as_deref(), Some("body.bin"));
    }

    #[test]
    fn test_raw_at_is_literal() {
        let (data, _, reads) = build_data(&[param(DataType::Raw, "@literal")], None, None);
        assert_eq!(data, vec![DataParam::Text(Word::from("@literal"))]);
        assert!(reads.is_none());
    }

    #[test]
    fn test_stdin_content() {
        let stdin = Word::from("line1\nline2\n");
        let (_, joined, reads) = build_data(&[param(DataType::Data, "@-")], Some(&stdin), None);
        assert_eq!(joined.to_string(), "line1line2");
        assert!(reads.is_none());

        let (_, joined, _) = build_data(&[param(DataType::Binary, "@-")], Some(&stdin), None);
        assert_eq!(joined.to_string(), "line1\nline2\n");
    }

    #[test]
    fn test_stdin_file() {
        let file = Word::from("input.txt");
        let (_, joined, reads) = build_data(&[param(DataType::Data, "@-")], None, Some(&file));
        assert_eq!(joined.to_string(), "@input.txt");
        assert_eq!(reads.as_deref(), Some("input.txt"));
    }

    fn reads(args: &[&str]) -> bool {
        let argv: Vec<Word> = std::iter::once("curl").chain(args.iter().copied()).map(Word::from).collect();
        let mut diagnostics = crate::diagnostics::Diagnostics::new();
        let global = crate::curl::args::parse_args(&argv, Default::default(), &mut diagnostics).unwrap();
        reads_stdin(&global)
    }

    #[test]
    fn test_reads_stdin_shapes() {
        assert!(reads(&["-d", "@-", "example.com"]));
        assert!(reads(&["--data-urlencode", "name@-", "example.com"]));
        assert!(reads(&["--data-urlencode", "@-", "example.com"]));
        assert!(reads(&["-T", "-", "example.com"]));
        assert!(!reads(&["-d", "token@-", "example.com"]));
        assert!(!reads(&["--data-urlencode", "a=b@-", "example.com"]));
        assert!(!reads(&["--data-raw", "@-", "example.com"]));
        assert!(!reads(&["-d", "a=1", "example.com"]));
    }

    #[test]
    fn test_json_not_separated() {
        assert_eq!(
            text(&[param(DataType::Json, "{\"a\":"), param(DataType::Json, "1}")]),
            "{\"a\":1}"
        );
    }
}
