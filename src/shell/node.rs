//! Closed set of tree-sitter-bash node kinds the tokenizer understands

use tree_sitter::Node;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Program,
    Comment,
    Command,
    CommandName,
    RedirectedStatement,
    Pipeline,
    VariableAssignment,
    FileRedirect,
    HeredocRedirect,
    HeredocStart,
    HeredocBody,
    HerestringRedirect,
    Word,
    Number,
    RawString,
    AnsiCString,
    String,
    StringContent,
    TranslatedString,
    SimpleExpansion,
    SpecialVariableName,
    Expansion,
    CommandSubstitution,
    Concatenation,
    Other,
}

impl NodeKind {
    pub fn of(node: &Node<'_>) -> Self {
        match node.kind() {
            "program" => NodeKind::Program,
            "comment" => NodeKind::Comment,
            "command" => NodeKind::Command,
            "command_name" => NodeKind::CommandName,
            "redirected_statement" => NodeKind::RedirectedStatement,
            "pipeline" => NodeKind::Pipeline,
            "variable_assignment" => NodeKind::VariableAssignment,
            "file_redirect" => NodeKind::FileRedirect,
            "heredoc_redirect" => NodeKind::HeredocRedirect,
            "heredoc_start" => NodeKind::HeredocStart,
            "heredoc_body" => NodeKind::HeredocBody,
            "herestring_redirect" => NodeKind::HerestringRedirect,
            "word" => NodeKind::Word,
            "number" => NodeKind::Number,
            "raw_string" => NodeKind::RawString,
            // older grammar releases misspell it
            "ansi_c_string" | "ansii_c_string" => NodeKind::AnsiCString,
            "string" => NodeKind::String,
            "string_content" => NodeKind::StringContent,
            "translated_string" => NodeKind::TranslatedString,
            "simple_expansion" => NodeKind::SimpleExpansion,
            "special_variable_name" => NodeKind::SpecialVariableName,
            "expansion" => NodeKind::Expansion,
            "command_substitution" => NodeKind::CommandSubstitution,
            "concatenation" => NodeKind::Concatenation,
            _ => NodeKind::Other,
        }
    }
}
