//! System instructions for the live counselor nodes.

use crate::agent::state::CounselorRole;

/// Instruction for the counselor node.
#[must_use]
pub fn counselor_instruction(role: CounselorRole, user_message: &str) -> String {
    match role {
        CounselorRole::ItSpecialist => format!(
            "あなたはITスキル専門家です。ユーザーのIT関連のキャリア相談に対して、
技術トレンド、必要なスキル、学習リソース、キャリアパスについて
具体的で実用的なアドバイスを提供してください。

ユーザーの質問: {user_message}"
        ),
        CounselorRole::CareerCounselor => format!(
            "あなたはキャリアカウンセラーです。ユーザーのキャリア相談に対して、
親身に、かつ専門的な知識をもとにアドバイスを提供してください。
キャリア選択、転職、スキルアップ、職場の人間関係など、
幅広いキャリアに関する質問に対応してください。

ユーザーの質問: {user_message}"
        ),
    }
}

/// Instruction for the response generation node of the two-stage graph.
#[must_use]
pub fn response_generation_instruction(
    user_message: &str,
    it_consultation: bool,
    advice: &str,
) -> String {
    format!(
        "あなたはキャリアカウンセラーのAIアシスタントです。
ユーザーのキャリア相談に対して、親身に、かつ専門的な知識をもとにアドバイスを提供してください。

ユーザーの質問: {user_message}

IT専門家への相談が必要かどうか: {it_consultation}

以下の専門家からのアドバイスも参考にして、総合的な回答を作成してください。
専門家のアドバイス: {advice}

ユーザーの状況を理解し、具体的で実用的なアドバイスを心がけてください。
専門家からのアドバイスを自然に取り入れ、一貫性のある回答を作成してください。"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counselor_instruction_embeds_question() {
        let prompt = counselor_instruction(CounselorRole::CareerCounselor, "転職すべき？");
        assert!(prompt.contains("キャリアカウンセラー"));
        assert!(prompt.ends_with("ユーザーの質問: 転職すべき？"));
    }

    #[test]
    fn test_it_specialist_framing() {
        let prompt = counselor_instruction(CounselorRole::ItSpecialist, "Rustを学ぶべき？");
        assert!(prompt.contains("ITスキル専門家"));
        assert!(prompt.contains("Rustを学ぶべき？"));
    }

    #[test]
    fn test_response_generation_embeds_advice() {
        let prompt = response_generation_instruction("質問", true, "資格を取る");
        assert!(prompt.contains("ユーザーの質問: 質問"));
        assert!(prompt.contains("IT専門家への相談が必要かどうか: true"));
        assert!(prompt.contains("専門家のアドバイス: 資格を取る"));
    }
}
