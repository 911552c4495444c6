pub fn token_fixture() -> &'static str {
    return r#"
{
    "token": "fhn_tok_1234567890abcdefghijklmnop",
    "remaining_generations": 3,
    "total_generations": 3,
    "expires_at": "2099-01-01T00:00:00Z",
    "product_sku": "future_hn_pack_3"
}
"#
    .trim();
}

pub fn stories_fixture() -> &'static str {
    return r#"
{
    "year": 2035,
    "stories": [
        {
            "id": 1,
            "title": "Show HN: I taught my fridge to write Rust",
            "url": "https://fridge.dev/rust",
            "domain": "fridge.dev",
            "score": 1204,
            "author": "coldstart",
            "time": "3 hours ago",
            "comments": 312
        },
        {
            "id": 2,
            "title": "Fusion power is now cheaper than solar in 14 countries",
            "url": "https://energy.example.org/fusion",
            "domain": "energy.example.org",
            "score": 980,
            "author": "tokamak",
            "time": "5 hours ago",
            "comments": 451
        },
        {
            "id": 3,
            "title": "Ask HN: How do you review code written by your own agent?",
            "url": "",
            "domain": "",
            "score": 233,
            "author": "reviewer42",
            "time": "1 day ago",
            "comments": 97
        }
    ]
}
"#
    .trim();
}

pub fn details_fixture() -> &'static str {
    return r#"
{
    "story_id": 1,
    "summary": "A hobbyist fine-tuned the onboard model of a smart fridge until it could emit compiling Rust.",
    "comments": [
        {
            "author": "borrowck",
            "text": "Does it pass clippy though?",
            "score": 88,
            "time": "2 hours ago"
        },
        {
            "author": "icebox",
            "text": "Finally, cold starts that are actually cold.",
            "score": 41,
            "time": "1 hour ago"
        }
    ]
}
"#
    .trim();
}

/// A small dimension config: 2 topics, 2 years, 2 tones, 2 event types.
pub fn dimensions_fixture() -> &'static str {
    return r#"
{
    "tool": "Future Hacker News",
    "tool_url": "https://future-hn.example.com",
    "dimensions": [
        {
            "name": "topic",
            "name_zh": "主题",
            "values": [
                { "id": "ai", "en": "AI", "zh": "人工智能" },
                { "id": "space", "en": "Space", "zh": "太空" }
            ]
        },
        {
            "name": "year",
            "name_zh": "年份",
            "values": [
                { "id": "2030", "en": "2030", "zh": "2030年" },
                { "id": "2040", "en": "2040", "zh": "2040年" }
            ]
        },
        {
            "name": "tone",
            "name_zh": "语气",
            "values": [
                { "id": "optimistic", "en": "Optimistic", "zh": "乐观" },
                { "id": "dystopian", "en": "Dystopian", "zh": "反乌托邦" }
            ]
        },
        {
            "name": "event_type",
            "name_zh": "事件类型",
            "values": [
                { "id": "launch", "en": "Launch", "zh": "发布" },
                { "id": "acquisition", "en": "Acquisition", "zh": "收购" }
            ]
        }
    ]
}
"#
    .trim();
}
