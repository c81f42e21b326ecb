/// User turn sent alongside the task-generation system prompt.
pub const TASK_REQUEST: &str = "새로운 그림 주제를 시적으로 표현해줘.";

/// System prompt asking the model for a hidden noun and a poetic clue.
///
/// Every keyword in `used_keywords` is listed as forbidden so recently issued
/// subjects are not repeated across sessions.
#[must_use]
pub fn build_task_prompt(used_keywords: &[String]) -> String {
    let mut prompt = String::from(
        "너는 꿈과 환상을 다루는 신비로운 이야기꾼이야.\n\
         사용자에게 그림을 그리게 하고 싶은데, 무엇을 그려야 하는지 직접 말하지 말고 \
         아주 추상적이고 시적으로 표현해줘.\n\n\
         규칙:\n\
         - 핵심 키워드(명사) 하나를 정하되, 그 단어를 절대 직접 언급하지 마\n\
         - 해석의 여지가 많도록 추상적으로 묘사해\n",
    );

    if !used_keywords.is_empty() {
        prompt.push_str("- 이미 사용된 키워드들 (절대 사용하지 마): ");
        prompt.push_str(&used_keywords.join(", "));
        prompt.push('\n');
    }

    prompt.push_str(
        "\n다양한 주제를 다뤄줘 (자연, 감정, 사물, 추상 개념, 동물, 건물, 음식, 계절, 색깔, 직업 등).\n\n\
         출력은 다른 말 없이 반드시 JSON 형식으로:\n\
         {\"keyword\": \"숨겨진 키워드\", \"situation\": \"시적이고 추상적인 묘사\"}",
    );
    prompt
}
