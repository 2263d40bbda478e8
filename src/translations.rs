// Locale tables. Keys missing from a locale fall back to EN.

pub(crate) static EN: &[(&str, &str)] = &[
    ("site-title", "Katya's JobFinder"),
    ("nav-jobs", "Jobs"),
    ("nav-applications", "My Applications"),
    ("btn-scrape", "Scan for Jobs"),
    ("jobs-count", "{n} jobs"),
    ("new-count", "{n} new"),
    ("filter-category", "Category"),
    ("filter-location", "Location"),
    ("filter-company", "Company"),
    ("filter-source", "Source"),
    ("btn-show-all", "Show all ({n})"),
    ("btn-show-less", "Show less"),
    ("btn-clear-filters", "Clear all"),
    ("filter-label-category", "Category"),
    ("filter-label-location", "Location"),
    ("filter-label-company", "Company"),
    ("filter-label-type", "Type"),
    ("filter-label-source", "Source"),
    ("type-direct", "Direct employer"),
    ("type-recruiter", "Via recruiter"),
    ("type-job_board", "Job board"),
    ("chip-direct", "Direct"),
    ("chip-recruiter", "Via recruiter"),
    ("chip-job_board", "Job board"),
    ("search-placeholder", "Search jobs by title, company, or keyword..."),
    ("showing-jobs", "Showing {shown} of {total} jobs"),
    ("showing-jobs-all", "Showing {n} jobs"),
    ("no-jobs-found", "No jobs found"),
    ("toggle-new", "Show only new"),
    ("sort-label", "Sort:"),
    ("sort-newest", "Newest first"),
    ("sort-score", "Best match"),
    ("sort-oldest", "Oldest first"),
    ("btn-load-more", "Load more"),
    ("btn-save", "Save"),
    ("btn-saved", "Saved!"),
    ("btn-already-saved", "Already saved"),
    ("btn-hide", "Hide"),
    ("btn-view", "View →"),
    ("salary-not-listed", "Salary not listed"),
    ("commute-from", "🚆 Commute from {home}"),
    ("get-directions", "Get directions →"),
    ("expand-hint", "Click card to see why Katya fits"),
    ("analysing-fit", "Analysing fit..."),
    ("fit-error", "Could not load analysis."),
    ("posted-on", "Posted on {source}"),
    ("empty-title", "No jobs yet"),
    ("empty-text", "Click Scan for Jobs to search all job boards."),
    ("scanning-text", "Scanning 6 job boards... this may take a minute."),
    ("scrape-done", "Done! {details}"),
    ("scrape-running", "Scrape is already running."),
    ("scrape-error", "Error scanning. Try again later."),
    ("scrape-new", "{count} new"),
    ("col-interested", "Interested"),
    ("col-applied", "Applied"),
    ("col-interview", "Interview"),
    ("col-offer", "Offer"),
    ("col-rejected", "Rejected"),
    ("btn-notes", "Notes"),
    ("btn-cover-letter", "Cover Letter"),
    ("btn-remove", "Remove"),
    ("saved-label", "Saved:"),
    ("applied-label", "Applied:"),
    ("reminder-label", "Reminder:"),
    ("modal-cover-letter", "Cover Letter"),
    ("modal-edit-notes", "Edit Notes"),
    ("notes-placeholder", "Add your notes..."),
    ("label-date-applied", "Date applied:"),
    ("label-reminder", "Reminder date:"),
    ("btn-save-notes", "Save"),
    ("btn-copy", "Copy to clipboard"),
    ("btn-copied", "Copied!"),
    ("generating-letter", "Generating cover letter..."),
    ("letter-error", "Error generating cover letter."),
    ("kanban-empty-title", "No saved applications"),
    ("kanban-empty-text", "Go to Jobs and click Save on jobs you're interested in."),
    ("nav-feedback", "Feedback"),
    ("filter-jobboards", "Job Boards"),
    ("toggle-dutch", "Hide jobs requiring Dutch"),
    ("add-board-placeholder", "Add a job board..."),
    ("add-keyword-placeholder", "Add search keyword..."),
    ("btn-add-keyword", "Add"),
    ("score-breakdown-title", "Score Breakdown"),
    ("score-total", "Total"),
    ("feedback-title", "Feedback"),
    ("feedback-subtitle", "Help us improve Katya's JobFinder"),
    ("feedback-improve-label", "What would you like to improve?"),
    ("feedback-improve-placeholder", "Tell us what could work better..."),
    ("feedback-boards-label", "What job boards or websites should we add?"),
    ("feedback-boards-placeholder", "e.g. Glassdoor, Nationale Vacaturebank..."),
    ("feedback-suggestions-label", "Any other suggestions?"),
    ("feedback-suggestions-placeholder", "Anything else you'd like to tell us..."),
    ("feedback-submit", "Send Feedback"),
    ("feedback-thanks", "Thank you for your feedback!"),
    ("feedback-history-title", "Previous Feedback"),
    ("feedback-empty", "No feedback submitted yet."),
    ("page-title-jobs", "Katya's JobFinder"),
    ("page-title-apps", "Katya's JobFinder — My Applications"),
    ("page-title-feedback", "Katya's JobFinder — Feedback"),
    ("feed-error", "Could not load jobs: {error}"),
    ("error-dismiss", "Esc to dismiss"),
    ("loading", "Loading..."),
    ("no-breakdown", "No score breakdown for this job"),
    ("hidden-job", "Hidden: {title}"),
    ("hidden-job-id", "Hidden job #{id}."),
    ("prefs-updated", "Preferences saved"),
    ("marked-seen", "All jobs marked as seen"),
    ("reminder-overdue", "overdue"),
    ("help-feed", " j/k:move  enter:fit  b:breakdown  s:save  h:hide  /:search  f:filters  o:sort  n:new  d:dutch  m:more  r:reload  S:scan  M:mark seen  L:lang  T:theme  U:ukraine  a:applications  q:quit"),
    ("help-search", " type to search  enter:done  esc:clear"),
    ("help-facets", " tab:next filter  j/k:move  enter:toggle  c:clear  C:clear all  esc:close"),
    ("help-board", " h/l:column  j/k:card  H/L:move card  1-5:move to column  e:notes  c:cover letter  x:remove  r:refresh  q:back"),
    ("help-letter", " j/k:scroll  esc:close"),
    ("help-notes", " tab:next field  enter:save  esc:cancel"),
];

pub(crate) static RU: &[(&str, &str)] = &[
    ("site-title", "Поиск работы Кати"),
    ("nav-jobs", "Вакансии"),
    ("nav-applications", "Мои заявки"),
    ("btn-scrape", "Поиск вакансий"),
    ("jobs-count", "{n} вакансий"),
    ("new-count", "{n} новых"),
    ("filter-category", "Категория"),
    ("filter-location", "Местоположение"),
    ("filter-company", "Компания"),
    ("filter-source", "Источник"),
    ("btn-show-all", "Показать все ({n})"),
    ("btn-show-less", "Показать меньше"),
    ("btn-clear-filters", "Очистить все"),
    ("filter-label-category", "Категория"),
    ("filter-label-location", "Местоположение"),
    ("filter-label-company", "Компания"),
    ("filter-label-type", "Тип"),
    ("filter-label-source", "Источник"),
    ("type-direct", "Прямой работодатель"),
    ("type-recruiter", "Через рекрутера"),
    ("type-job_board", "Доска объявлений"),
    ("chip-direct", "Прямой"),
    ("chip-recruiter", "Через рекрутера"),
    ("chip-job_board", "Доска объявлений"),
    ("search-placeholder", "Поиск по названию, компании или ключевому слову..."),
    ("showing-jobs", "Показано {shown} из {total} вакансий"),
    ("showing-jobs-all", "Показано {n} вакансий"),
    ("no-jobs-found", "Вакансии не найдены"),
    ("toggle-new", "Только новые"),
    ("sort-label", "Сортировка:"),
    ("sort-newest", "Сначала новые"),
    ("sort-score", "Лучшее совпадение"),
    ("sort-oldest", "Сначала старые"),
    ("btn-load-more", "Загрузить ещё"),
    ("btn-save", "Сохранить"),
    ("btn-saved", "Сохранено!"),
    ("btn-already-saved", "Уже сохранено"),
    ("btn-hide", "Скрыть"),
    ("btn-view", "Смотреть →"),
    ("salary-not-listed", "Зарплата не указана"),
    ("commute-from", "🚆 Дорога из дома ({home})"),
    ("hidden-job-id", "Вакансия #{id} скрыта."),
    ("get-directions", "Маршрут →"),
    ("expand-hint", "Нажмите на карточку, чтобы узнать почему Катя подходит"),
    ("analysing-fit", "Анализируем..."),
    ("fit-error", "Не удалось загрузить анализ."),
    ("posted-on", "Размещено на {source}"),
    ("empty-title", "Пока нет вакансий"),
    ("empty-text", "Нажмите Поиск вакансий, чтобы найти работу на всех сайтах."),
    ("scanning-text", "Сканируем 6 сайтов с вакансиями... это может занять минуту."),
    ("scrape-done", "Готово! {details}"),
    ("scrape-running", "Поиск уже запущен."),
    ("scrape-error", "Ошибка сканирования. Попробуйте позже."),
    ("scrape-new", "{count} новых"),
    ("col-interested", "Интересно"),
    ("col-applied", "Отклик"),
    ("col-interview", "Собеседование"),
    ("col-offer", "Оффер"),
    ("col-rejected", "Отказ"),
    ("btn-notes", "Заметки"),
    ("btn-cover-letter", "Сопроводительное"),
    ("btn-remove", "Удалить"),
    ("saved-label", "Сохранено:"),
    ("applied-label", "Отклик:"),
    ("reminder-label", "Напоминание:"),
    ("modal-cover-letter", "Сопроводительное письмо"),
    ("modal-edit-notes", "Редактировать заметки"),
    ("notes-placeholder", "Добавьте заметки..."),
    ("label-date-applied", "Дата отклика:"),
    ("label-reminder", "Дата напоминания:"),
    ("btn-save-notes", "Сохранить"),
    ("btn-copy", "Скопировать"),
    ("btn-copied", "Скопировано!"),
    ("generating-letter", "Генерируем сопроводительное..."),
    ("letter-error", "Ошибка генерации письма."),
    ("kanban-empty-title", "Нет сохранённых заявок"),
    ("kanban-empty-text", "Перейдите на Вакансии и нажмите Сохранить на интересных вакансиях."),
    ("nav-feedback", "Отзывы"),
    ("filter-jobboards", "Сайты вакансий"),
    ("toggle-dutch", "Скрыть вакансии, требующие голландский"),
    ("add-board-placeholder", "Добавить сайт вакансий..."),
    ("add-keyword-placeholder", "Добавить ключевое слово..."),
    ("btn-add-keyword", "Добавить"),
    ("score-breakdown-title", "Разбор оценки"),
    ("score-total", "Итого"),
    ("feedback-title", "Отзывы"),
    ("feedback-subtitle", "Помогите нам улучшить поиск работы"),
    ("feedback-improve-label", "Что бы вы хотели улучшить?"),
    ("feedback-improve-placeholder", "Расскажите, что можно сделать лучше..."),
    ("feedback-boards-label", "Какие сайты вакансий добавить?"),
    ("feedback-boards-placeholder", "напр. Glassdoor, Nationale Vacaturebank..."),
    ("feedback-suggestions-label", "Другие предложения?"),
    ("feedback-suggestions-placeholder", "Что-нибудь ещё..."),
    ("feedback-submit", "Отправить отзыв"),
    ("feedback-thanks", "Спасибо за ваш отзыв!"),
    ("feedback-history-title", "Предыдущие отзывы"),
    ("feedback-empty", "Пока нет отзывов."),
    ("page-title-jobs", "Поиск работы Кати"),
    ("page-title-apps", "Поиск работы Кати — Мои заявки"),
    ("page-title-feedback", "Поиск работы Кати — Отзывы"),
];

pub(crate) static UA: &[(&str, &str)] = &[
    ("site-title", "Пошук роботи Каті"),
    ("nav-jobs", "Вакансії"),
    ("nav-applications", "Мої заявки"),
    ("btn-scrape", "Пошук вакансій"),
    ("jobs-count", "{n} вакансій"),
    ("new-count", "{n} нових"),
    ("filter-category", "Категорія"),
    ("filter-location", "Місцезнаходження"),
    ("filter-company", "Компанія"),
    ("filter-source", "Джерело"),
    ("btn-show-all", "Показати все ({n})"),
    ("btn-show-less", "Показати менше"),
    ("btn-clear-filters", "Очистити все"),
    ("filter-label-category", "Категорія"),
    ("filter-label-location", "Місцезнаходження"),
    ("filter-label-company", "Компанія"),
    ("filter-label-type", "Тип"),
    ("filter-label-source", "Джерело"),
    ("type-direct", "Прямий роботодавець"),
    ("type-recruiter", "Через рекрутера"),
    ("type-job_board", "Дошка оголошень"),
    ("chip-direct", "Прямий"),
    ("chip-recruiter", "Через рекрутера"),
    ("chip-job_board", "Дошка оголошень"),
    ("search-placeholder", "Пошук за назвою, компанією або ключовим словом..."),
    ("showing-jobs", "Показано {shown} з {total} вакансій"),
    ("showing-jobs-all", "Показано {n} вакансій"),
    ("no-jobs-found", "Вакансії не знайдено"),
    ("toggle-new", "Лише нові"),
    ("sort-label", "Сортування:"),
    ("sort-newest", "Спочатку нові"),
    ("sort-score", "Найкращий збіг"),
    ("sort-oldest", "Спочатку старі"),
    ("btn-load-more", "Завантажити ще"),
    ("btn-save", "Зберегти"),
    ("btn-saved", "Збережено!"),
    ("btn-already-saved", "Вже збережено"),
    ("btn-hide", "Приховати"),
    ("btn-view", "Дивитись →"),
    ("salary-not-listed", "Зарплата не вказана"),
    ("commute-from", "🚆 Дорога з дому ({home})"),
    ("hidden-job-id", "Вакансію #{id} приховано."),
    ("get-directions", "Маршрут →"),
    ("expand-hint", "Натисніть на картку, щоб дізнатися чому Катя підходить"),
    ("analysing-fit", "Аналізуємо..."),
    ("fit-error", "Не вдалося завантажити аналіз."),
    ("posted-on", "Розміщено на {source}"),
    ("empty-title", "Поки немає вакансій"),
    ("empty-text", "Натисніть Пошук вакансій, щоб знайти роботу на всіх сайтах."),
    ("scanning-text", "Скануємо 6 сайтів з вакансіями... це може зайняти хвилину."),
    ("scrape-done", "Готово! {details}"),
    ("scrape-running", "Пошук вже запущено."),
    ("scrape-error", "Помилка сканування. Спробуйте пізніше."),
    ("scrape-new", "{count} нових"),
    ("col-interested", "Цікаво"),
    ("col-applied", "Відгук"),
    ("col-interview", "Співбесіда"),
    ("col-offer", "Оффер"),
    ("col-rejected", "Відмова"),
    ("btn-notes", "Нотатки"),
    ("btn-cover-letter", "Супровідний лист"),
    ("btn-remove", "Видалити"),
    ("saved-label", "Збережено:"),
    ("applied-label", "Відгук:"),
    ("reminder-label", "Нагадування:"),
    ("modal-cover-letter", "Супровідний лист"),
    ("modal-edit-notes", "Редагувати нотатки"),
    ("notes-placeholder", "Додайте нотатки..."),
    ("label-date-applied", "Дата відгуку:"),
    ("label-reminder", "Дата нагадування:"),
    ("btn-save-notes", "Зберегти"),
    ("btn-copy", "Скопіювати"),
    ("btn-copied", "Скопійовано!"),
    ("generating-letter", "Генеруємо супровідний лист..."),
    ("letter-error", "Помилка генерації листа."),
    ("kanban-empty-title", "Немає збережених заявок"),
    ("kanban-empty-text", "Перейдіть на Вакансії і натисніть Зберегти на цікавих вакансіях."),
    ("nav-feedback", "Відгуки"),
    ("filter-jobboards", "Сайти вакансій"),
    ("toggle-dutch", "Сховати вакансії, що вимагають голландську"),
    ("add-board-placeholder", "Додати сайт вакансій..."),
    ("add-keyword-placeholder", "Додати ключове слово..."),
    ("btn-add-keyword", "Додати"),
    ("score-breakdown-title", "Розбір оцінки"),
    ("score-total", "Всього"),
    ("feedback-title", "Відгуки"),
    ("feedback-subtitle", "Допоможіть нам покращити пошук роботи"),
    ("feedback-improve-label", "Що б ви хотіли покращити?"),
    ("feedback-improve-placeholder", "Розкажіть, що можна зробити краще..."),
    ("feedback-boards-label", "Які сайти вакансій додати?"),
    ("feedback-boards-placeholder", "напр. Glassdoor, Nationale Vacaturebank..."),
    ("feedback-suggestions-label", "Інші пропозиції?"),
    ("feedback-suggestions-placeholder", "Будь-що інше..."),
    ("feedback-submit", "Надіслати відгук"),
    ("feedback-thanks", "Дякуємо за ваш відгук!"),
    ("feedback-history-title", "Попередні відгуки"),
    ("feedback-empty", "Поки немає відгуків."),
    ("page-title-jobs", "Пошук роботи Каті"),
    ("page-title-apps", "Пошук роботи Каті — Мої заявки"),
    ("page-title-feedback", "Пошук роботи Каті — Відгуки"),
];
