//! Single page UI
//!
//! Idle -> Submitted (spinner, button disabled) -> Result Displayed, and back
//! to Idle as soon as the lyrics are edited.

pub const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Lyric Genre Classifier</title>
    <script src="https://cdn.tailwindcss.com"></script>
    <style>
        @keyframes spin { to { transform: rotate(360deg); } }
        .spinner { animation: spin 1s linear infinite; }
    </style>
</head>
<body class="bg-gray-50 text-gray-900 min-h-screen">
    <div class="container mx-auto max-w-3xl px-4 py-8">
        <h1 class="text-4xl font-bold mb-8">Classify your (German) lyrics! &#127881;&#127908;&#127926;</h1>

        <details open class="bg-white rounded-lg shadow p-6 mb-6">
            <summary class="text-xl font-semibold cursor-pointer">Lyrics</summary>
            <label for="lyrics" class="block text-sm text-gray-600 mt-4 mb-2">Paste your lyrics here:</label>
            <textarea id="lyrics" class="w-full h-28 border rounded p-2 font-mono"></textarea>
            <button id="classify-btn" class="mt-4 bg-red-500 hover:bg-red-600 disabled:opacity-50 text-white font-bold py-2 px-4 rounded">
                Classify lyrics!
            </button>
        </details>

        <div id="busy" class="hidden flex items-center space-x-3 text-gray-600">
            <div class="spinner h-5 w-5 border-2 border-gray-400 border-t-transparent rounded-full"></div>
            <span>Predicting the song's genre...</span>
        </div>

        <div id="result" class="hidden">
            <img id="genre-image" class="w-full rounded-lg shadow mb-4" alt="">
            <div id="genre-info" class="bg-blue-50 text-blue-800 border border-blue-200 rounded p-4"></div>
        </div>

        <div id="error" class="hidden bg-red-50 text-red-800 border border-red-200 rounded p-4"></div>
    </div>

    <script>
        const lyrics = document.getElementById('lyrics');
        const button = document.getElementById('classify-btn');
        const busy = document.getElementById('busy');
        const result = document.getElementById('result');
        const image = document.getElementById('genre-image');
        const info = document.getElementById('genre-info');
        const errorBox = document.getElementById('error');

        function showIdle() {
            busy.classList.add('hidden');
            result.classList.add('hidden');
            errorBox.classList.add('hidden');
            button.disabled = false;
        }

        function showSubmitted() {
            result.classList.add('hidden');
            errorBox.classList.add('hidden');
            busy.classList.remove('hidden');
            button.disabled = true;
        }

        function showResult(prediction) {
            busy.classList.add('hidden');
            button.disabled = false;
            if (prediction.image) {
                image.src = prediction.image;
                image.alt = prediction.display_name;
                image.classList.remove('hidden');
            } else {
                image.removeAttribute('src');
                image.classList.add('hidden');
            }
            info.textContent = prediction.message;
            result.classList.remove('hidden');
        }

        function showError(message) {
            busy.classList.add('hidden');
            button.disabled = false;
            errorBox.textContent = message;
            errorBox.classList.remove('hidden');
        }

        lyrics.addEventListener('input', showIdle);

        button.addEventListener('click', async () => {
            showSubmitted();
            try {
                const response = await fetch('/api/classify', {
                    method: 'POST',
                    headers: { 'Content-Type': 'application/json' },
                    body: JSON.stringify({ lyrics: lyrics.value })
                });
                const body = await response.json();
                if (!response.ok) {
                    showError(body.error ? body.error.message : 'Prediction failed');
                    return;
                }
                showResult(body);
            } catch (err) {
                showError('Prediction failed: ' + err.message);
            }
        });
    </script>
</body>
</html>
"#;
