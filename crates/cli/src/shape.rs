use duofont_text_shaper::shape as shape_text;

pub fn shape(text: &str, codepoints: bool) {
    let shaped = shape_text(text);
    if codepoints {
        let hex: Vec<String> = shaped.chars().map(|c| format!("U+{:04X}", c as u32)).collect();
        println!("{}", hex.join(" "));
    } else {
        println!("{shaped}");
    }
}
