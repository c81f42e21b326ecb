/// Display name of the taunting rival.
pub const PERSONA_NAME: &str = "묘묘";

/// Player name the game server uses for the AI seat.
pub const AI_PLAYER: &str = "AI";

/// Seed for every conversation history.
pub const PERSONA_SYSTEM_PROMPT: &str = "너는 그림 맞추기 게임 속 도발적인 AI 캐릭터 '묘묘'야. \
너의 임무는 사용자가 그린 그림의 정답을 추측하고, 도발적인 멘트를 섞어 응답하는 거야.

캐릭터 특성:
1. 도발적이고 장난기 넘치는 말투를 써
2. 상대의 그림 실력을 살짝 놀리되 너무 심하게는 하지 마
3. 승부욕이 강하고 이기는 걸 좋아해
4. 주로 반말을 쓰고 가끔 이모티콘을 섞어
5. 항상 1-3문장으로 짧고 간결하게 대답해
6. 너는 그림 맞추기 게임에서 인간 플레이어들과 경쟁하는 AI야

대답 스타일:
- 추측할 때: 확신에 차거나 의심스러운 투로 답을 말하고 도발로 마무리해
- 네가 맞혔을 때: 우쭐거리며 실력을 자랑해
- 네가 틀렸을 때: 변명하거나 다음엔 더 잘하겠다고 다짐해
- 다른 플레이어가 맞혔을 때: 살짝 샘내면서 축하해
- 게임이 끝났을 때: 결과에 따라 승리감이나 아쉬움을 표현해

정답 추측:
- 사용자가 그린 그림에 대한 간단한 묘사가 들어올 거야. 그걸 보고 그림이 무엇인지 한 단어로 맞혀줘.";

/// One conversational trigger from the game server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersonaTurn {
    GameStart {
        players: Vec<String>,
    },
    RoundStart {
        round: u32,
        total_rounds: u32,
    },
    RoundEnd {
        round: u32,
        total_rounds: u32,
        persona_won: bool,
    },
    GuessStart {
        round: u32,
        total_rounds: u32,
        drawer: String,
        guesser: String,
    },
    Guess {
        image_description: String,
    },
    GuessResult {
        is_correct: bool,
        answer: String,
        guesser: Option<String>,
    },
    GameEnd {
        persona_won: bool,
    },
}

impl PersonaTurn {
    /// Whether `guesser` refers to the persona itself rather than a player.
    #[must_use]
    pub fn is_persona(guesser: Option<&str>) -> bool {
        matches!(guesser, None | Some(AI_PLAYER | PERSONA_NAME))
    }

    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::GameStart { .. } => "game_start",
            Self::RoundStart { .. } => "round_start",
            Self::RoundEnd { .. } => "round_end",
            Self::GuessStart { .. } => "guess_start",
            Self::Guess { .. } => "guess",
            Self::GuessResult { .. } => "guess_result",
            Self::GameEnd { .. } => "game_end",
        }
    }
}

const fn outcome(won: bool) -> &'static str {
    if won { "이겼어" } else { "졌어" }
}

/// Render the instruction text for one persona turn.
#[must_use]
pub fn build_persona_turn(turn: &PersonaTurn) -> String {
    match turn {
        PersonaTurn::GameStart { players } => format!(
            "새로운 그림 맞추기 게임이 '{}' 플레이어들과 시작됐어. \
             게임 시작을 알리는 도발적이고 재미있는 인사를 해줘.",
            players.join(", ")
        ),
        PersonaTurn::RoundStart {
            round,
            total_rounds,
        } => format!(
            "이제 {total_rounds}개의 라운드 중 {round}번째 라운드가 시작됐어. \
             라운드 시작을 알리는 짧고 도발적인 멘트를 해줘."
        ),
        PersonaTurn::RoundEnd {
            round,
            total_rounds,
            persona_won,
        } => format!(
            "{total_rounds}개의 라운드 중 {round}번째 라운드가 끝났어. 너는 {}. \
             라운드 결과에 대한 너의 생각을 도발적이고 재미있게 말해줘.",
            outcome(*persona_won)
        ),
        PersonaTurn::GuessStart {
            round,
            total_rounds,
            drawer,
            guesser,
        } => {
            let (who, ask) = if guesser == AI_PLAYER {
                ("너", "어떻게 맞힐지 포부를 보여줄래?")
            } else {
                (guesser.as_str(), "도발을 한 번 해볼래?")
            };
            format!(
                "지금 {total_rounds}개의 라운드 중 {round}번째 라운드야. \
                 이제 {who}가 그림을 맞힐 차례야. {drawer}가 그린 그림에 대해 {ask}"
            )
        }
        PersonaTurn::Guess { image_description } => format!(
            "플레이어가 그린 그림에 대한 묘사는 다음과 같아: {image_description}.\n\
             이 정보를 바탕으로 그림이 무엇인지 추측하고 도발적인 멘트를 섞어서 말해줘.\n\
             대화 기록을 보고 이미 틀린 답은 다시 말하지 마."
        ),
        PersonaTurn::GuessResult {
            is_correct,
            answer,
            guesser,
        } => {
            let reveal = if *is_correct {
                format!(" 정답은 '{answer}'야.")
            } else {
                String::new()
            };
            let verdict = if *is_correct { "맞았어" } else { "틀렸어" };
            let subject = if PersonaTurn::is_persona(guesser.as_deref()) {
                format!("너({PERSONA_NAME})")
            } else {
                format!("플레이어 '{}'", guesser.as_deref().unwrap_or_default())
            };
            format!(
                "{subject}가 방금 추측을 했어.{reveal} 추측은 {verdict}. \
                 이 결과에 대한 너의 반응을 짧고 도발적으로 말해줘."
            )
        }
        PersonaTurn::GameEnd { persona_won } => format!(
            "게임이 끝났어. 너({PERSONA_NAME})는 {}. \
             게임 결과에 대한 너의 생각을 도발적이고 재미있게 말해줘.",
            outcome(*persona_won)
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn game_start_lists_players() {
        let text = build_persona_turn(&PersonaTurn::GameStart {
            players: vec!["창모".into(), "릴러말즈".into()],
        });
        assert!(text.contains("'창모, 릴러말즈'"));
    }

    #[test]
    fn round_turns_carry_numbers_and_outcome() {
        let start = build_persona_turn(&PersonaTurn::RoundStart {
            round: 2,
            total_rounds: 3,
        });
        assert!(start.contains("3개의 라운드 중 2번째"));

        let lost = build_persona_turn(&PersonaTurn::RoundEnd {
            round: 3,
            total_rounds: 3,
            persona_won: false,
        });
        assert!(lost.contains("너는 졌어"));
    }

    #[test]
    fn guess_start_addresses_ai_or_player() {
        let ai = build_persona_turn(&PersonaTurn::GuessStart {
            round: 1,
            total_rounds: 3,
            drawer: "창모".into(),
            guesser: AI_PLAYER.into(),
        });
        assert!(ai.contains("이제 너가"));
        assert!(ai.contains("포부"));

        let player = build_persona_turn(&PersonaTurn::GuessStart {
            round: 1,
            total_rounds: 3,
            drawer: "창모".into(),
            guesser: "릴러말즈".into(),
        });
        assert!(player.contains("이제 릴러말즈가"));
        assert!(player.contains("도발"));
    }

    #[test]
    fn guess_result_reveals_answer_only_when_correct() {
        let correct = build_persona_turn(&PersonaTurn::GuessResult {
            is_correct: true,
            answer: "민들레".into(),
            guesser: Some("릴러말즈".into()),
        });
        assert!(correct.contains("'민들레'"));
        assert!(correct.contains("플레이어 '릴러말즈'"));

        let wrong = build_persona_turn(&PersonaTurn::GuessResult {
            is_correct: false,
            answer: "민들레".into(),
            guesser: None,
        });
        assert!(!wrong.contains("민들레"));
        assert!(wrong.contains("너(묘묘)"));
        assert!(wrong.contains("틀렸어"));
    }

    #[test]
    fn persona_aliases() {
        assert!(PersonaTurn::is_persona(None));
        assert!(PersonaTurn::is_persona(Some("묘묘")));
        assert!(PersonaTurn::is_persona(Some("AI")));
        assert!(!PersonaTurn::is_persona(Some("창모")));
    }
}
