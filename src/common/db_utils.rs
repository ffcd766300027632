// src/common/db_utils.rs

// ---
// Adaptador de placeholders: as queries são escritas com `?` e o Postgres quer `$1, $2, ...`.
// ---
/// Troca o N-ésimo `?` pelo `$N`, preservando a ordem dos parâmetros.
/// `?` dentro de literais ('...') ou identificadores ("...") não é tocado.
pub(crate) fn pg_placeholders(sql: &str) -> String {
    let mut out = String::with_capacity(sql.len() + 8);
    let mut index = 0;
    let mut in_literal = false;
    let mut in_identifier = false;

    for ch in sql.chars() {
        match ch {
            '\'' if !in_identifier => {
                // '' (aspas escapadas) alterna duas vezes e volta ao mesmo estado
                in_literal = !in_literal;
                out.push(ch);
            }
            '"' if !in_literal => {
                in_identifier = !in_identifier;
                out.push(ch);
            }
            '?' if !in_literal && !in_identifier => {
                index += 1;
                out.push('$');
                out.push_str(&index.to_string());
            }
            _ => out.push(ch),
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers_placeholders_in_order() {
        assert_eq!(
            pg_placeholders("SELECT * FROM t WHERE a = ? AND b = ? LIMIT ?"),
            "SELECT * FROM t WHERE a = $1 AND b = $2 LIMIT $3"
        );
    }

    #[test]
    fn leaves_question_marks_inside_quotes_alone() {
        assert_eq!(
            pg_placeholders(r#"SELECT '?', "odd?col" FROM t WHERE x = ? AND y = 'it''s ?'"#),
            r#"SELECT '?', "odd?col" FROM t WHERE x = $1 AND y = 'it''s ?'"#
        );
    }

    #[test]
    fn query_without_placeholders_is_unchanged() {
        let sql = "SELECT COUNT(1) FROM tenants";
        assert_eq!(pg_placeholders(sql), sql);
    }
}
