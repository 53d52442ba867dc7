//! Plain-text views printed to stdout.

use quiz_core::model::{
    AdminOption, AdminQuestion, AdminTopic, AttemptSummary, QuizResult, ReviewMark, TopicSummary,
};
use services::QuizSession;

const BAR_WIDTH: usize = 20;

pub fn topics(topics: &[TopicSummary]) {
    if topics.is_empty() {
        println!("No topics available.");
        return;
    }
    println!(
        "{:>4}  {:<28} {:>8} {:>8} {:>8} {:>6}",
        "id", "topic", "beginner", "moderate", "expert", "total"
    );
    for topic in topics {
        println!(
            "{:>4}  {:<28} {:>8} {:>8} {:>8} {:>6}",
            topic.topic_id.value(),
            topic.topic_name,
            topic.beginner_questions,
            topic.moderate_questions,
            topic.expert_questions,
            topic.total_questions
        );
        if let Some(description) = topic.description.as_deref().filter(|d| !d.is_empty()) {
            println!("      {description}");
        }
    }
}

pub fn history(attempts: &[AttemptSummary]) {
    if attempts.is_empty() {
        println!("No attempts yet.");
        return;
    }
    for attempt in attempts {
        let when = attempt
            .attempted_at
            .map(|at| at.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "-".into());
        println!(
            "#{:<6} {:<16} {:<10} {:>3}/{:<3} {:>6.1}%  {}",
            attempt.attempt_id.value(),
            attempt.topic_name.as_deref().unwrap_or("Mixed"),
            attempt.difficulty_level.as_deref().unwrap_or("-"),
            attempt.score,
            attempt.total_questions,
            attempt.percentage,
            when
        );
    }
}

pub fn question(session: &QuizSession) {
    let (Some(question), Some(progress)) = (session.current_question(), session.progress())
    else {
        return;
    };
    let selected = session.selected_option(question.question_id);

    println!();
    println!(
        "Question {} of {}  {}  {}%",
        progress.index + 1,
        progress.total,
        bar(progress.fraction()),
        progress.percent()
    );
    if let Some(topic) = &question.topic_name {
        println!("[{topic}]");
    }
    println!("{}", question.text);
    for (position, option) in question.options.iter().enumerate() {
        let marker = if selected == Some(option.option_id) { '*' } else { ' ' };
        println!(" {marker} {}) {}", position + 1, option.text);
    }
    let next = if progress.is_last { "submit" } else { "next" };
    println!("[1-{}] choose, n {next}, p previous, q quit", question.options.len());
}

pub fn result(result: &QuizResult) {
    println!();
    if result.topic_names.is_empty() {
        println!("Quiz result ({})", result.difficulty_level.label());
    } else {
        println!(
            "{} ({})",
            result.topic_names.join(", "),
            result.difficulty_level.label()
        );
    }
    println!(
        "Score: {}/{}  ({:.1}%)  correct {}, wrong {}",
        result.score,
        result.total_questions,
        result.percentage,
        result.correct_answers,
        result.wrong_answers
    );
    if let Some(attempt) = result.attempt_id {
        println!("Attempt #{attempt}");
    }

    for (number, review) in result.question_reviews.iter().enumerate() {
        println!();
        println!("{}. {}", number + 1, review.question_text);
        for option in &review.options {
            let tag = match option.mark() {
                ReviewMark::ChosenCorrect => "+",
                ReviewMark::ChosenWrong => "x",
                ReviewMark::CorrectAnswer => ">",
                ReviewMark::Neutral => " ",
            };
            match option.mark().label() {
                Some(label) => println!("  {tag} {}  ({label})", option.text),
                None => println!("  {tag} {}", option.text),
            }
        }
    }
}

pub fn admin_topics(topics: &[AdminTopic]) {
    if topics.is_empty() {
        println!("No topics yet.");
        return;
    }
    for topic in topics {
        admin_topic(topic);
    }
}

pub fn admin_topic(topic: &AdminTopic) {
    let created = topic
        .created_at
        .map(|at| at.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "-".into());
    println!("{:>4}  {:<28} {}", topic.id.value(), topic.name, created);
    if let Some(description) = topic.description.as_deref().filter(|d| !d.is_empty()) {
        println!("      {description}");
    }
}

pub fn admin_questions(questions: &[AdminQuestion]) {
    if questions.is_empty() {
        println!("No questions found.");
        return;
    }
    for question in questions {
        admin_question(question);
    }
}

pub fn admin_question(question: &AdminQuestion) {
    println!();
    println!(
        "#{} [{} / {}] {}",
        question.id.value(),
        question.topic_name.as_deref().unwrap_or("-"),
        question.difficulty_level.map_or("-", |level| level.label()),
        question.question_text
    );
    for option in &question.options {
        println!("{}", admin_option(option));
    }
}

fn admin_option(option: &AdminOption) -> String {
    let tag = if option.is_correct { '>' } else { ' ' };
    format!("  {tag} {:<6} {}", option.id.value(), option.option_text)
}

fn bar(fraction: f64) -> String {
    let filled = ((fraction.clamp(0.0, 1.0) * BAR_WIDTH as f64).round() as usize).min(BAR_WIDTH);
    format!("[{}{}]", "#".repeat(filled), "-".repeat(BAR_WIDTH - filled))
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::OptionId;

    #[test]
    fn bar_fills_in_proportion() {
        assert_eq!(bar(0.5), format!("[{}{}]", "#".repeat(10), "-".repeat(10)));
        assert_eq!(bar(1.0), format!("[{}]", "#".repeat(BAR_WIDTH)));
        assert_eq!(bar(0.0), format!("[{}]", "-".repeat(BAR_WIDTH)));
    }

    #[test]
    fn answer_key_is_tagged() {
        let option = |is_correct| AdminOption {
            id: OptionId::new(7),
            option_text: "&".into(),
            is_correct,
        };
        assert_eq!(admin_option(&option(true)), "  > 7      &");
        assert_eq!(admin_option(&option(false)), "    7      &");
    }
}
