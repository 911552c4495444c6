use anyhow::Result;

use super::build;
use super::format_product;
use super::format_token;
use super::help_text;
use crate::domain::models::Product;
use crate::domain::models::Token;

fn token(expires_at: &str) -> Token {
    return Token {
        token: "fhn_tok_1234567890abcdefghijklmnop".to_string(),
        remaining_generations: 2,
        total_generations: Some(3),
        expires_at: expires_at.to_string(),
        product_sku: Some("future_hn_pack_3".to_string()),
    };
}

#[test]
fn it_formats_tokens() {
    insta::assert_snapshot!(format_token(&token("2099-01-01T00:00:00Z")), @"- fhn_tok_1234...efghijklmnop 2/3 remaining, expires 2099-01-01T00:00:00Z, future_hn_pack_3");
}

#[test]
fn it_marks_expired_tokens() {
    let res = format_token(&token("2020-01-01T00:00:00Z"));
    assert!(res.ends_with("(expired)"));
}

#[test]
fn it_formats_products() {
    let lines = Product::catalog()
        .iter()
        .map(format_product)
        .collect::<Vec<String>>()
        .join("\n");

    insta::assert_snapshot!(lines, @r###"
    - future_hn_pack_3: 3 generations for $7.99 ($2.66 per generation), most popular
    - future_hn_pack_10: 10 generations for $19.99 ($2.00 per generation), save 25%
    "###);
}

#[test]
fn it_lists_hotkeys() {
    let text = help_text();
    assert!(text.starts_with("HOTKEYS:"));
    assert!(text.contains("- p - Open pricing."));
}

#[test]
fn it_parses_seo_generate() -> Result<()> {
    let matches = build().try_get_matches_from(vec![
        "futurehn",
        "seo",
        "generate",
        "--dry-run",
        "-o",
        "./public",
    ])?;

    let (_, seo_matches) = matches.subcommand().unwrap();
    let (name, generate_matches) = seo_matches.subcommand().unwrap();
    assert_eq!(name, "generate");
    assert!(generate_matches.get_flag("dry-run"));
    assert_eq!(
        generate_matches.get_one::<String>("output-dir").unwrap(),
        "./public"
    );

    return Ok(());
}

#[test]
fn it_rejects_unknown_languages() {
    let res = build().try_get_matches_from(vec!["futurehn", "--lang", "klingon"]);
    assert!(res.is_err());

    let res = build().try_get_matches_from(vec!["futurehn", "tokens", "list", "--lang", "ko"]);
    assert!(res.is_ok());
}
