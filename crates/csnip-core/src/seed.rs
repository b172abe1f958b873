//! Built-in example snippets used to bootstrap an empty store

use crate::language::Language;
use crate::models::SnippetDraft;

/// "Hello, World!" in every language the example catalogue covers
pub const HELLO_WORLD: [(Language, &str); 9] = [
    (
        Language::Go,
        "package main\n\nimport \"fmt\"\n\nfunc main() {\n    fmt.Println(\"Hello, World!\")\n}",
    ),
    (Language::Python, "print(\"Hello, World!\")"),
    (Language::JavaScript, "console.log(\"Hello, World!\");"),
    (
        Language::Java,
        "public class Main {\n    public static void main(String[] args) {\n        System.out.println(\"Hello, World!\");\n    }\n}",
    ),
    (
        Language::C,
        "#include <stdio.h>\n\nint main() {\n    printf(\"Hello, World!\\n\");\n    return 0;\n}",
    ),
    (Language::Ruby, "puts \"Hello, World!\""),
    (Language::Php, "<?php\n echo \"Hello, World!\";\n?>"),
    (Language::Swift, "import Foundation\n\nprint(\"Hello, World!\")"),
    (Language::Kotlin, "fun main() {\n    println(\"Hello, World!\")\n}"),
];

/// Drafts for the example catalogue, one independent snippet per language
pub fn example_drafts() -> Vec<SnippetDraft> {
    HELLO_WORLD
        .iter()
        .map(|(lang, code)| {
            let title = format!("Hello World Example in {lang}");
            SnippetDraft::new(*code, lang.as_str())
                .with_name(title.clone())
                .with_tags("example,generated")
                .with_description(title)
                .with_source("generated")
        })
        .collect()
}
