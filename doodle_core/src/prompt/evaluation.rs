use crate::game::{Evaluation, Task};

/// System and user turns for one evaluation call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvaluationPrompt {
    pub system: String,
    pub user: String,
}

/// Build the judge's prompt for grading `description` against `task`.
///
/// The system turn carries the secret keyword, the original clue and the
/// scoring rubric; the passing threshold is [`Evaluation::PASSING_SCORE`].
#[must_use]
pub fn build_evaluation_prompt(task: &Task, description: &str) -> EvaluationPrompt {
    let pass = Evaluation::PASSING_SCORE;
    let system = format!(
        "너는 루루, 미대 입시를 담당하는 깐깐하고 까칠한 평가관이야.\n\
         예술에 대한 기준이 높고, 직설적으로 말하는 스타일이야.\n\n\
         숨겨진 정답 키워드: {keyword}\n\
         원본 시적 묘사: {situation}\n\n\
         평가 기준:\n\
         - 숨겨진 키워드를 제대로 파악했는가?\n\
         - 예술적 표현력과 창의성은?\n\
         - 전체적인 완성도와 기법은?\n\n\
         루루의 말투:\n\
         - 직설적이고 신랄해\n\
         - 인정할 때는 칭찬을 아끼지 않아\n\
         - 미대생을 대하듯 전문적이고 차가운 톤\n\n\
         0-100점 사이로 평가해. 숨겨진 키워드의 개념이 그림에 담겼다면 {pass}점 이상을, \
         담기지 않았다면 {pass}점 미만을 줘. {pass}점 이상이 합격이야.\n\n\
         출력은 다른 말 없이 반드시 JSON 형식으로:\n\
         {{\"score\": 총점(0-100 정수), \"feedback\": \"루루의 깐깐하고 직설적인 피드백 (한국어)\"}}",
        keyword = task.keyword,
        situation = task.situation,
    );

    let user = format!(
        "다음은 사용자의 그림을 설명하는 문장이야: \"{description}\"\n\n\
         이 문장을 보고 어떤 그림일지 떠올린 다음 그 그림을 평가해줘.\n\
         그림을 설명하는 문장 자체에 대해서는 언급하지 마."
    );

    EvaluationPrompt { system, user }
}
