// Benchmark helper functions - Rust's dead code analysis doesn't understand
// that these are used by benchmark files in the same directory
// See: https://users.rust-lang.org/t/cargo-rustc-benches-awarnings/110111/2

/// One annotated TypeScript block using every annotation kind.
#[allow(dead_code)]
pub fn annotated_block(lines: usize) -> String {
    let mut body = String::new();
    body.push_str("// !collapse(1:4)\n");
    for i in 0..lines {
        match i % 4 {
            0 => body.push_str(&format!("// !tooltip[/value{i}/] Holds item {i}\n")),
            1 => body.push_str("// !mark[/=/g]\n"),
            2 => body.push_str("// !highlight\n"),
            _ => body.push_str(&format!("// !bold{{1-{}}}\n", 5 + i % 7)),
        }
        body.push_str(&format!("const value{i} = compute({i}, \"text\"); // trailing\n"));
    }
    format!("```ts title=\"bench.ts\"\n{body}```\n")
}

/// A page with prose between `blocks` annotated code blocks.
#[allow(dead_code)]
pub fn generate_mdx_page(blocks: usize, lines: usize) -> String {
    let mut content = String::from("# Benchmark\n\n");
    for section in 0..blocks {
        content.push_str(&format!("## Section {section}\n\nSome prose before the code.\n\n"));
        content.push_str(&annotated_block(lines));
        content.push('\n');
    }
    content
}
