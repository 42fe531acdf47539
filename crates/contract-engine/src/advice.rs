//! Prompt construction and answer parsing for the clause advisor
//!
//! The advisor is asked to reply in a fixed two-section format so the answer
//! can be split into the supplier's wording and the commentary without any
//! further model calls.

use shared_types::ClauseAdvice;

pub const REVISION_MARKER: &str = "РЕДАКЦИЯ_ПОСТАВЩИКА:";
pub const COMMENTS_MARKER: &str = "КОММЕНТАРИИ:";

/// Role framing sent ahead of every clause prompt
pub const SYSTEM_PREAMBLE: &str = "Ты - опытный российский юрист, защищающий интересы ПОСТАВЩИКА. \
Отвечай детально и конкретно, только на русском языке.";

/// Build the review request for one clause.
pub fn build_clause_prompt(number: usize, clause: &str) -> String {
    format!(
        "{SYSTEM_PREAMBLE}\n\n\
Проанализируй пункт договора с позиции ПОСТАВЩИКА.\n\n\
ПУНКТ {number}:\n\
{clause}\n\n\
ВАЖНО: Ответь СТРОГО в следующем формате:\n\n\
{REVISION_MARKER}\n\
[Напиши ПОЛНЫЙ исправленный текст пункта, защищающий интересы Поставщика. \
Используй конкретные цифры: неустойка 0,05-0,1% в день, максимум 5-10%, \
сроки 5-10 рабочих дней, лимит ответственности 30% от договора. \
Если исправить невозможно или пункт корректный, напиши: \"Редакция Покупателя приемлема\"]\n\n\
{COMMENTS_MARKER}\n\
[Напиши рекомендации для Поставщика:\n\
- В чем риск для Поставщика?\n\
- Почему предложена такая редакция?\n\
- Что важно согласовать дополнительно?\n\
Если редакция приемлема, напиши почему она защищает интересы Поставщика]\n\n\
Отвечай БЕЗ лишнего текста, строго по формату выше."
    )
}

/// Split an advisor answer into revision and comments.
///
/// Without the revision marker the whole answer is kept as commentary.
pub fn parse_advice(answer: &str) -> ClauseAdvice {
    if !answer.contains(REVISION_MARKER) {
        return ClauseAdvice {
            revision: String::new(),
            comments: answer.trim().to_string(),
        };
    }

    let mut sections = answer.split(COMMENTS_MARKER);
    let revision = sections
        .next()
        .unwrap_or_default()
        .replace(REVISION_MARKER, "")
        .trim()
        .to_string();
    let comments = sections.next().unwrap_or_default().trim().to_string();

    ClauseAdvice { revision, comments }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    #[test]
    fn test_parses_both_sections() {
        let answer = "РЕДАКЦИЯ_ПОСТАВЩИКА:\n  Неустойка 0,1% в день, не более 10%.\n\nКОММЕНТАРИИ:\n Риск неограниченной ответственности.  ";
        let advice = parse_advice(answer);
        assert_eq!(advice.revision, "Неустойка 0,1% в день, не более 10%.");
        assert_eq!(advice.comments, "Риск неограниченной ответственности.");
    }

    #[test]
    fn test_missing_comments_section() {
        let advice = parse_advice("РЕДАКЦИЯ_ПОСТАВЩИКА: Редакция Покупателя приемлема");
        assert_eq!(advice.revision, "Редакция Покупателя приемлема");
        assert_eq!(advice.comments, "");
        assert!(advice.accepts_buyer_wording());
    }

    #[test]
    fn test_free_form_answer_becomes_comments() {
        let advice = parse_advice("  Пункт сформулирован корректно.  ");
        assert_eq!(advice.revision, "");
        assert_eq!(advice.comments, "Пункт сформулирован корректно.");
    }

    #[test]
    fn test_second_comments_marker_ends_comments() {
        let answer = "РЕДАКЦИЯ_ПОСТАВЩИКА: А\nКОММЕНТАРИИ: Б\nКОММЕНТАРИИ: В";
        let advice = parse_advice(answer);
        assert_eq!(advice.revision, "А");
        assert_eq!(advice.comments, "Б");
    }

    #[test]
    fn test_prompt_carries_clause_and_format() {
        let prompt = build_clause_prompt(3, "Поставщик уплачивает штраф 50%.");
        assert!(prompt.starts_with(SYSTEM_PREAMBLE));
        assert!(prompt.contains("ПУНКТ 3:\nПоставщик уплачивает штраф 50%."));
        assert!(prompt.contains(REVISION_MARKER));
        assert!(prompt.contains(COMMENTS_MARKER));
    }

    proptest! {
        #[test]
        fn parsed_sections_are_trimmed(answer in "\\PC{0,200}") {
            let advice = parse_advice(&answer);
            prop_assert_eq!(advice.revision.trim(), advice.revision.as_str());
            prop_assert_eq!(advice.comments.trim(), advice.comments.as_str());
        }
    }
}
